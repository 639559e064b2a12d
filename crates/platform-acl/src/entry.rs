//! # ACL Entries
//!
//! An entry grants a set of permission levels to one entity: a single user or
//! a group inside a project. Entries are identified by their [`EntityKey`].

use serde::{Deserialize, Serialize};
use std::fmt;

use platform_org::Actor;

use crate::error::{AclError, AclResult};
use crate::permission::{PermissionLevel, PermissionSet};

/// Kind of entity an ACL entry grants to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Malformed or missing entity type
    Unspecified,
    /// A single user
    User,
    /// A group scoped to a project
    ProjectGroup,
}

impl EntityType {
    /// Get the string representation of the entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Unspecified => "unspecified",
            EntityType::User => "user",
            EntityType::ProjectGroup => "project_group",
        }
    }

    /// Get the interoperable wire value.
    pub fn wire_value(&self) -> i32 {
        match self {
            EntityType::Unspecified => 0,
            EntityType::User => 1,
            EntityType::ProjectGroup => 2,
        }
    }

    /// Decode a wire value.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::InvalidPermission`] for values outside `0..=2`.
    pub fn from_wire(value: i32) -> AclResult<Self> {
        match value {
            0 => Ok(EntityType::Unspecified),
            1 => Ok(EntityType::User),
            2 => Ok(EntityType::ProjectGroup),
            other => Err(AclError::InvalidPermission(format!(
                "unknown entity type value {}",
                other
            ))),
        }
    }
}

/// Identity key of an ACL entry: `(entity_id, entity_project, entity_type)`.
///
/// At most one entry per key exists in an ACL.
///
/// # Example
///
/// ```
/// use platform_acl::EntityKey;
///
/// let key = EntityKey::project_group("proj-1", "researchers");
/// assert_eq!(key.to_string(), "project_group:proj-1/researchers");
/// assert_eq!(EntityKey::user("alice").to_string(), "user:alice");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EntityKey {
    /// User id or group id
    pub entity_id: String,
    /// Project namespace of the entity (empty for plain users)
    #[serde(default)]
    pub entity_project: String,
    /// Kind of entity
    pub entity_type: EntityType,
}

impl EntityKey {
    /// Key for a user grant.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            entity_id: user_id.into(),
            entity_project: String::new(),
            entity_type: EntityType::User,
        }
    }

    /// Key for a project-group grant.
    pub fn project_group(project: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            entity_id: group.into(),
            entity_project: project.into(),
            entity_type: EntityType::ProjectGroup,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entity_project.is_empty() {
            write!(f, "{}:{}", self.entity_type.as_str(), self.entity_id)
        } else {
            write!(
                f,
                "{}:{}/{}",
                self.entity_type.as_str(),
                self.entity_project,
                self.entity_id
            )
        }
    }
}

/// A grant of permission levels to an entity.
///
/// # Example
///
/// ```
/// use platform_acl::{AclEntry, PermissionLevel};
/// use platform_org::Actor;
///
/// let entry = AclEntry::user("alice", [PermissionLevel::Read]);
/// assert!(entry.applies_to(&Actor::new("alice")));
/// assert!(!entry.applies_to(&Actor::new("carol")));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AclEntry {
    /// User id or group id
    pub entity_id: String,
    /// Project namespace of the entity (relevant for project groups)
    #[serde(default)]
    pub entity_project: String,
    /// Kind of entity
    pub entity_type: EntityType,
    /// Granted levels (never `Provider`)
    pub permissions: PermissionSet,
}

impl AclEntry {
    /// Create an entry for an identity key.
    pub fn new<I>(key: EntityKey, permissions: I) -> Self
    where
        I: IntoIterator<Item = PermissionLevel>,
    {
        Self {
            entity_id: key.entity_id,
            entity_project: key.entity_project,
            entity_type: key.entity_type,
            permissions: PermissionSet::from_levels(permissions),
        }
    }

    /// Create a user grant.
    pub fn user<I>(user_id: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = PermissionLevel>,
    {
        Self::new(EntityKey::user(user_id), permissions)
    }

    /// Create a project-group grant.
    pub fn project_group<I>(project: impl Into<String>, group: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = PermissionLevel>,
    {
        Self::new(EntityKey::project_group(project, group), permissions)
    }

    /// Get the identity key of this entry.
    pub fn key(&self) -> EntityKey {
        EntityKey {
            entity_id: self.entity_id.clone(),
            entity_project: self.entity_project.clone(),
            entity_type: self.entity_type,
        }
    }

    /// Check the identity key without allocating.
    pub fn has_key(&self, key: &EntityKey) -> bool {
        self.entity_type == key.entity_type
            && self.entity_id == key.entity_id
            && self.entity_project == key.entity_project
    }

    /// Check whether this entry grants to the actor.
    ///
    /// User entries match the actor id. Project-group entries match when the
    /// actor belongs to `entity_id` within `entity_project`.
    pub fn applies_to(&self, actor: &Actor) -> bool {
        match self.entity_type {
            EntityType::User => self.entity_id == actor.id,
            EntityType::ProjectGroup => actor.belongs_to_group(&self.entity_project, &self.entity_id),
            EntityType::Unspecified => false,
        }
    }

    /// Validate the entry as a new grant.
    ///
    /// # Errors
    ///
    /// - [`AclError::InvalidPermission`] for an unspecified entity type, an
    ///   unspecified level or any attempt to grant `Provider`
    /// - [`AclError::Validation`] for an empty entity id, a project group
    ///   without project, or an empty permission set
    pub fn validate(&self) -> AclResult<()> {
        let key = self.key();

        if self.entity_type == EntityType::Unspecified {
            return Err(AclError::InvalidPermission(format!(
                "entity type must be user or project_group for {}",
                key
            )));
        }
        if self.entity_id.is_empty() {
            return Err(AclError::Validation("entity id must not be empty".to_string()));
        }
        if self.entity_type == EntityType::ProjectGroup && self.entity_project.is_empty() {
            return Err(AclError::Validation(format!(
                "project group {} must name its project",
                key
            )));
        }
        if self.permissions.is_empty() {
            return Err(AclError::Validation(format!(
                "entry {} grants no permissions",
                key
            )));
        }
        if self.permissions.contains(PermissionLevel::Provider) {
            return Err(AclError::InvalidPermission(format!(
                "provider permission cannot be granted through an ACL ({})",
                key
            )));
        }
        if self.permissions.contains(PermissionLevel::Unspecified) {
            return Err(AclError::InvalidPermission(format!(
                "unspecified permission in entry {}",
                key
            )));
        }

        Ok(())
    }
}
