//! # ACL Ledger
//!
//! The per-resource list of grants and the delta that changes it.
//!
//! An [`Acl`] is immutable: [`Acl::apply`] validates a whole [`AclUpdate`] and
//! returns a new ACL, leaving the original untouched on failure. Stores publish
//! the returned value as a fresh snapshot, so readers never see a partially
//! applied delta.
//!
//! ## Delta Semantics
//!
//! ```text
//! 1. every deleted key must exist           -> EntryNotFound
//! 2. every new entry must be a valid grant  -> InvalidPermission / Validation
//! 3. remove deleted keys                    (survivors keep their order)
//! 4. upsert new entries                     (replace permissions, else append)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entry::{AclEntry, EntityKey};
use crate::error::{AclError, AclResult};

/// How to treat two `new_entries` with the same identity key in one update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// The later entry in the batch replaces the earlier one.
    #[default]
    LastWriteWins,
    /// The update fails with a validation error.
    Reject,
}

impl DuplicateKeyPolicy {
    /// Parse a policy from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "last_write_wins" | "last-write-wins" | "lww" => Some(Self::LastWriteWins),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// A delta against an ACL: entries to add or replace, keys to remove.
///
/// # Example
///
/// ```
/// use platform_acl::{AclEntry, AclUpdate, EntityKey, PermissionLevel};
///
/// let update = AclUpdate::new()
///     .grant(AclEntry::user("alice", [PermissionLevel::Edit]))
///     .revoke(EntityKey::user("carol"));
///
/// assert_eq!(update.new_entries.len(), 1);
/// assert_eq!(update.deleted_entries.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AclUpdate {
    /// Entries to add, or whose permissions replace an existing entry's
    #[serde(default)]
    pub new_entries: Vec<AclEntry>,

    /// Identity keys to remove
    #[serde(default)]
    pub deleted_entries: Vec<EntityKey>,
}

impl AclUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to grant.
    pub fn grant(mut self, entry: AclEntry) -> Self {
        self.new_entries.push(entry);
        self
    }

    /// Add a key to remove.
    pub fn revoke(mut self, key: EntityKey) -> Self {
        self.deleted_entries.push(key);
        self
    }

    /// Check if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.new_entries.is_empty() && self.deleted_entries.is_empty()
    }
}

/// The grants on one resource, unique per identity key.
///
/// The owner is not listed here; ownership is computed from the resource's
/// [`Owner`](crate::owner::Owner).
///
/// Deserialization runs the same checks as a grant: every entry must be valid
/// and keys must be unique.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<AclEntry>", into = "Vec<AclEntry>")]
pub struct Acl {
    entries: Vec<AclEntry>,
}

impl TryFrom<Vec<AclEntry>> for Acl {
    type Error = AclError;

    fn try_from(entries: Vec<AclEntry>) -> AclResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            entry.validate()?;
            let key = entry.key();
            if !seen.insert(key.clone()) {
                return Err(AclError::Validation(format!("duplicate entry for {}", key)));
            }
        }
        Ok(Self { entries })
    }
}

impl From<Acl> for Vec<AclEntry> {
    fn from(acl: Acl) -> Self {
        acl.entries
    }
}

impl Acl {
    /// Create an empty ACL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in insertion order of first appearance.
    pub fn entries(&self) -> &[AclEntry] {
        &self.entries
    }

    /// Look up an entry by identity key.
    pub fn get(&self, key: &EntityKey) -> Option<&AclEntry> {
        self.entries.iter().find(|e| e.has_key(key))
    }

    /// Check if an entry with this key exists.
    pub fn contains_key(&self, key: &EntityKey) -> bool {
        self.get(key).is_some()
    }

    /// Get the count of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply a delta with the default [`DuplicateKeyPolicy::LastWriteWins`].
    ///
    /// # Errors
    ///
    /// See [`Acl::apply_with_policy`].
    pub fn apply(&self, update: &AclUpdate) -> AclResult<Acl> {
        self.apply_with_policy(update, DuplicateKeyPolicy::default())
    }

    /// Apply a delta, returning the new ACL.
    ///
    /// The operation is all-or-nothing: on error `self` is unchanged and no
    /// new ACL is produced.
    ///
    /// # Errors
    ///
    /// - [`AclError::EntryNotFound`] if a deleted key is not in the ACL
    /// - [`AclError::InvalidPermission`] if a new entry grants `Provider` or
    ///   carries an unspecified level or entity type
    /// - [`AclError::Validation`] for structurally invalid entries, or for
    ///   duplicate keys in one batch under [`DuplicateKeyPolicy::Reject`]
    pub fn apply_with_policy(&self, update: &AclUpdate, policy: DuplicateKeyPolicy) -> AclResult<Acl> {
        for key in &update.deleted_entries {
            if !self.contains_key(key) {
                return Err(AclError::EntryNotFound(key.clone()));
            }
        }

        let mut seen = HashSet::new();
        for entry in &update.new_entries {
            entry.validate()?;
            let key = entry.key();
            if !seen.insert(key.clone()) && policy == DuplicateKeyPolicy::Reject {
                return Err(AclError::Validation(format!(
                    "duplicate entry for {} in the same update",
                    key
                )));
            }
        }

        let deleted: HashSet<&EntityKey> = update.deleted_entries.iter().collect();
        let mut entries: Vec<AclEntry> = self
            .entries
            .iter()
            .filter(|e| !deleted.contains(&e.key()))
            .cloned()
            .collect();

        for incoming in &update.new_entries {
            match entries.iter_mut().find(|e| e.has_key(&incoming.key())) {
                Some(existing) => existing.permissions = incoming.permissions.clone(),
                None => entries.push(incoming.clone()),
            }
        }

        Ok(Acl { entries })
    }
}
