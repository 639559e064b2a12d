//! # Platform Events
//!
//! This crate provides the audit event bus for drive lifecycle and ACL
//! changes.
//!
//! ## Overview
//!
//! The platform-events crate handles:
//! - **Event Types**: The `Event` envelope and typed `DriveEvent`s
//! - **Event Bus**: Publish/subscribe messaging on topic patterns
//!
//! ## Usage
//!
//! ```rust,no_run
//! use platform_acl::{AclEntry, AclUpdate, PermissionLevel};
//! use platform_events::{DriveEvent, EventBus, MemoryEventBus};
//!
//! async fn audit_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     // Everything that touches an ACL
//!     let mut sub = bus.subscribe("drives.acl.*").await.unwrap();
//!
//!     let update = AclUpdate::new().grant(AclEntry::user("alice", [PermissionLevel::Read]));
//!     let event = DriveEvent::acl_updated(7, &update).into_event("bob").unwrap();
//!     bus.publish(event).await.unwrap();
//!
//!     while let Ok(event) = sub.recv().await {
//!         println!("{} by {}", event.topic, event.actor_id);
//!     }
//! }
//! ```
//!
//! ## Topic Patterns
//!
//! Topics are structured as `drives.{subject}.{action}`:
//! - `drives.drive.created` - A drive was created
//! - `drives.drive.deleted` - A drive was deleted
//! - `drives.acl.updated` - An ACL delta was applied
//!
//! Wildcards:
//! - `*` matches exactly one segment
//! - `#` matches zero or more segments

pub mod bus;
pub mod types;

// Re-export main types
pub use bus::{
    topic_matches, EventBus, EventBusError, EventBusResult, EventBusStats, MemoryEventBus,
    Subscription,
};
pub use types::{DriveEvent, Event, TOPIC_PREFIX};
