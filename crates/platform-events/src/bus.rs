//! Event bus implementation
//!
//! This module provides the event bus abstraction and an in-memory
//! implementation for publishing and subscribing to audit events.

use crate::types::Event;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Event bus error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventBusError {
    /// Failed to publish event
    #[error("Failed to publish event: {0}")]
    PublishError(String),

    /// Unknown subscription
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Receiver fell behind and events were dropped
    #[error("Subscriber lagged, {0} events skipped")]
    Lagged(u64),

    /// Channel closed
    #[error("Channel closed")]
    ChannelClosed,
}

/// Result type for event bus operations.
pub type EventBusResult<T> = Result<T, EventBusError>;

/// Subscription handle for receiving events.
#[derive(Debug)]
pub struct Subscription {
    /// Subscription ID
    pub id: String,
    /// Topic pattern
    pub pattern: String,
    receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Receive the next event.
    pub async fn recv(&mut self) -> EventBusResult<Event> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => EventBusError::ChannelClosed,
            broadcast::error::RecvError::Lagged(n) => EventBusError::Lagged(n),
        })
    }

    /// Receive an already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}

/// Event bus trait for publish/subscribe operations.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event.
    async fn publish(&self, event: Event) -> EventBusResult<()>;

    /// Subscribe to a topic pattern.
    ///
    /// Topic patterns support wildcards:
    /// - `*` matches any single segment
    /// - `#` matches zero or more segments
    ///
    /// Examples:
    /// - `drives.drive.*` matches `drives.drive.created`, `drives.drive.deleted`
    /// - `drives.#` matches every drive event
    async fn subscribe(&self, pattern: &str) -> EventBusResult<Subscription>;

    /// Drop a subscription.
    async fn unsubscribe(&self, subscription_id: &str) -> EventBusResult<()>;

    /// Get event bus stats.
    async fn stats(&self) -> EventBusStats;
}

/// Event bus statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBusStats {
    /// Total events published
    pub events_published: u64,
    /// Total deliveries to subscribers
    pub events_delivered: u64,
    /// Active subscriptions
    pub active_subscriptions: usize,
}

/// Check if a dot-separated topic matches a pattern.
///
/// # Example
///
/// ```
/// use platform_events::topic_matches;
///
/// assert!(topic_matches("drives.*.created", "drives.drive.created"));
/// assert!(topic_matches("drives.#", "drives.acl.updated"));
/// assert!(!topic_matches("drives.drive.*", "drives.acl.updated"));
/// ```
pub fn topic_matches(pattern: &str, topic: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let topic: Vec<&str> = topic.split('.').collect();
    segments_match(&pattern, &topic)
}

fn segments_match(pattern: &[&str], topic: &[&str]) -> bool {
    match (pattern.split_first(), topic.split_first()) {
        (None, None) => true,
        (Some((&"#", rest)), _) => (0..=topic.len()).any(|skip| segments_match(rest, &topic[skip..])),
        (Some((&"*", rest)), Some((_, topic_rest))) => segments_match(rest, topic_rest),
        (Some((segment, rest)), Some((head, topic_rest))) => {
            segment == head && segments_match(rest, topic_rest)
        }
        _ => false,
    }
}

/// In-memory event bus implementation.
///
/// One broadcast channel per distinct pattern; subscribers sharing a pattern
/// share the channel.
pub struct MemoryEventBus {
    /// Pattern channels
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<Event>>>>,
    /// Subscription id to pattern
    subscriptions: Arc<RwLock<HashMap<String, String>>>,
    /// Statistics
    stats: Arc<RwLock<EventBusStats>>,
    /// Channel capacity
    channel_capacity: usize,
}

impl std::fmt::Debug for MemoryEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEventBus")
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

impl MemoryEventBus {
    /// Create a new in-memory event bus.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create with custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(EventBusStats::default())),
            channel_capacity: capacity.max(1),
        }
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: Event) -> EventBusResult<()> {
        let mut delivered = 0u64;

        {
            let channels = self.channels.read().await;
            for (pattern, sender) in channels.iter() {
                if topic_matches(pattern, &event.topic) {
                    // No live receivers is not an error
                    if let Ok(receivers) = sender.send(event.clone()) {
                        delivered += receivers as u64;
                    }
                }
            }
        }

        {
            let mut stats = self.stats.write().await;
            stats.events_published += 1;
            stats.events_delivered += delivered;
        }

        debug!(
            topic = %event.topic,
            event_id = %event.id,
            delivered,
            "Event published"
        );

        Ok(())
    }

    async fn subscribe(&self, pattern: &str) -> EventBusResult<Subscription> {
        let id = uuid::Uuid::now_v7().to_string();

        // Same lock order as unsubscribe: the id is registered before any
        // unsubscribe can decide the pattern's channel is unused.
        let mut subscriptions = self.subscriptions.write().await;
        let receiver = self
            .channels
            .write()
            .await
            .entry(pattern.to_string())
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0)
            .subscribe();
        subscriptions.insert(id.clone(), pattern.to_string());
        drop(subscriptions);

        {
            let mut stats = self.stats.write().await;
            stats.active_subscriptions += 1;
        }

        debug!(subscription_id = %id, pattern = %pattern, "Subscribed");

        Ok(Subscription {
            id,
            pattern: pattern.to_string(),
            receiver,
        })
    }

    async fn unsubscribe(&self, subscription_id: &str) -> EventBusResult<()> {
        let mut subscriptions = self.subscriptions.write().await;
        let pattern = subscriptions
            .remove(subscription_id)
            .ok_or_else(|| EventBusError::SubscriptionNotFound(subscription_id.to_string()))?;

        if !subscriptions.values().any(|p| *p == pattern) {
            self.channels.write().await.remove(&pattern);
        }

        let mut stats = self.stats.write().await;
        stats.active_subscriptions = stats.active_subscriptions.saturating_sub(1);

        Ok(())
    }

    async fn stats(&self) -> EventBusStats {
        self.stats.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn event(topic: &str) -> Event {
        Event::new(topic, "bob", 1, serde_json::json!({}))
    }

    #[tokio::test]
    async fn test_memory_event_bus_publish_subscribe() {
        let bus = MemoryEventBus::new();
        let mut sub = bus.subscribe("drives.drive.*").await.unwrap();

        bus.publish(event("drives.drive.created")).await.unwrap();

        let received = tokio::time::timeout(Duration::from_millis(100), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.topic, "drives.drive.created");
    }

    #[tokio::test]
    async fn test_non_matching_subscriber_receives_nothing() {
        let bus = MemoryEventBus::new();
        let mut sub = bus.subscribe("drives.acl.*").await.unwrap();

        bus.publish(event("drives.drive.deleted")).await.unwrap();

        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_topic_matching() {
        // Exact match
        assert!(topic_matches("drives.drive.created", "drives.drive.created"));

        // Single wildcard
        assert!(topic_matches("drives.drive.*", "drives.drive.created"));
        assert!(topic_matches("*.acl.updated", "drives.acl.updated"));
        assert!(!topic_matches("drives.*", "drives.acl.updated"));

        // Multi-segment wildcard
        assert!(topic_matches("drives.#", "drives.acl.updated"));
        assert!(topic_matches("#", "drives.acl.updated"));
        assert!(topic_matches("drives.#.updated", "drives.acl.updated"));
        assert!(topic_matches("drives.drive.#", "drives.drive"));

        // Non-matches
        assert!(!topic_matches("drives.drive.deleted", "drives.drive.created"));
        assert!(!topic_matches("files.#", "drives.drive.created"));
    }

    #[tokio::test]
    async fn test_stats_and_unsubscribe() {
        let bus = MemoryEventBus::new();

        let sub = bus.subscribe("drives.#").await.unwrap();
        assert_eq!(bus.stats().await.active_subscriptions, 1);

        bus.publish(event("drives.drive.deleted")).await.unwrap();
        let stats = bus.stats().await;
        assert_eq!(stats.events_published, 1);
        assert_eq!(stats.events_delivered, 1);

        bus.unsubscribe(&sub.id).await.unwrap();
        assert_eq!(bus.stats().await.active_subscriptions, 0);

        let err = bus.unsubscribe(&sub.id).await.unwrap_err();
        assert!(matches!(err, EventBusError::SubscriptionNotFound(_)));
    }

    #[tokio::test]
    async fn test_unsubscribe_keeps_channel_for_remaining_subscriber() {
        let bus = MemoryEventBus::new();
        let first = bus.subscribe("drives.#").await.unwrap();
        let mut second = bus.subscribe("drives.#").await.unwrap();

        bus.unsubscribe(&first.id).await.unwrap();
        bus.publish(event("drives.acl.updated")).await.unwrap();

        let received = tokio::time::timeout(Duration::from_millis(100), second.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.topic, "drives.acl.updated");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_subscribe_racing_unsubscribe_stays_connected() {
        let bus = Arc::new(MemoryEventBus::new());

        for _ in 0..200 {
            let leaving = bus.subscribe("drives.#").await.unwrap();

            let joining = {
                let bus = bus.clone();
                tokio::spawn(async move { bus.subscribe("drives.#").await })
            };
            let unsubscribing = {
                let bus = bus.clone();
                tokio::spawn(async move { bus.unsubscribe(&leaving.id).await })
            };

            let mut joined = joining.await.unwrap().unwrap();
            unsubscribing.await.unwrap().unwrap();

            bus.publish(event("drives.drive.created")).await.unwrap();
            let received = joined.try_recv().expect("subscriber lost its channel");
            assert_eq!(received.topic, "drives.drive.created");

            bus.unsubscribe(&joined.id).await.unwrap();
        }

        assert_eq!(bus.stats().await.active_subscriptions, 0);
    }
}
