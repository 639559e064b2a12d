//! Audit event types
//!
//! This module defines the envelope published on the bus and the drive
//! lifecycle events carried inside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use platform_acl::{AclEntry, AclUpdate, EntityKey};
use platform_listing::{Metadata, ResourceId};

use crate::bus::{EventBusError, EventBusResult};

/// Topic prefix for every drive event.
pub const TOPIC_PREFIX: &str = "drives";

/// Event envelope.
///
/// Envelopes carry routing and audit metadata; the domain event lives in
/// `payload` as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Unique event ID (UUIDv7, time-ordered)
    pub id: Uuid,

    /// Dot-separated routing topic (e.g. `drives.acl.updated`)
    pub topic: String,

    /// When the event was created
    pub timestamp: DateTime<Utc>,

    /// Actor whose request produced the event
    pub actor_id: String,

    /// Resource the event is about
    pub resource_id: ResourceId,

    /// Serialized domain event
    pub payload: serde_json::Value,
}

impl Event {
    /// Create a new event.
    ///
    /// # Arguments
    ///
    /// * `topic` - Routing topic
    /// * `actor_id` - The acting user
    /// * `resource_id` - Affected resource
    /// * `payload` - The event payload
    pub fn new(
        topic: impl Into<String>,
        actor_id: impl Into<String>,
        resource_id: ResourceId,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            topic: topic.into(),
            timestamp: Utc::now(),
            actor_id: actor_id.into(),
            resource_id,
            payload,
        }
    }

    /// Parse the payload into a specific type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// Drive lifecycle and ACL events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriveEvent {
    /// A drive was created
    Created {
        /// Stored metadata of the new drive
        drive: Metadata,
    },

    /// A drive was deleted
    Deleted {
        /// Deleted drive
        resource_id: ResourceId,
    },

    /// A drive's ACL changed
    AclUpdated {
        /// Drive whose ACL changed
        resource_id: ResourceId,
        /// Entries granted or replaced
        #[serde(default)]
        added: Vec<AclEntry>,
        /// Keys revoked
        #[serde(default)]
        removed: Vec<EntityKey>,
    },
}

impl DriveEvent {
    /// Event for a newly created drive.
    pub fn created(drive: Metadata) -> Self {
        Self::Created { drive }
    }

    /// Event for a deleted drive.
    pub fn deleted(resource_id: ResourceId) -> Self {
        Self::Deleted { resource_id }
    }

    /// Event recording an applied delta as an add/remove pair.
    pub fn acl_updated(resource_id: ResourceId, update: &AclUpdate) -> Self {
        Self::AclUpdated {
            resource_id,
            added: update.new_entries.clone(),
            removed: update.deleted_entries.clone(),
        }
    }

    /// Resource this event is about.
    pub fn resource_id(&self) -> ResourceId {
        match self {
            Self::Created { drive } => drive.id,
            Self::Deleted { resource_id } | Self::AclUpdated { resource_id, .. } => *resource_id,
        }
    }

    /// Routing topic.
    pub fn topic(&self) -> String {
        let suffix = match self {
            Self::Created { .. } => "drive.created",
            Self::Deleted { .. } => "drive.deleted",
            Self::AclUpdated { .. } => "acl.updated",
        };
        format!("{}.{}", TOPIC_PREFIX, suffix)
    }

    /// Wrap into an envelope attributed to `actor_id`.
    pub fn into_event(self, actor_id: &str) -> EventBusResult<Event> {
        let topic = self.topic();
        let resource_id = self.resource_id();
        let payload = serde_json::to_value(&self)
            .map_err(|e| EventBusError::SerializationError(e.to_string()))?;

        Ok(Event::new(topic, actor_id, resource_id, payload))
    }
}
