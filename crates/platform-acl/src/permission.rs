//! # Permission Levels
//!
//! Capability levels an actor can hold on a resource, and sets of them.
//!
//! The normal hierarchy is `Read < Edit < Admin`. `Provider` sits outside of
//! it: it is checked on its own and never stands in for `Admin`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{AclError, AclResult};

/// A capability level on a resource.
///
/// The derived `Ord` only orders levels inside a [`PermissionSet`]. Hierarchy
/// decisions go through [`PermissionLevel::satisfies`].
///
/// # Wire Values
///
/// | level | value |
/// |---|---|
/// | `Unspecified` | 0 |
/// | `Read` | 1 |
/// | `Edit` | 2 |
/// | `Admin` | 3 |
/// | `Provider` | 4 |
///
/// # Example
///
/// ```
/// use platform_acl::PermissionLevel;
///
/// assert!(PermissionLevel::Admin.satisfies(PermissionLevel::Read));
/// assert!(!PermissionLevel::Read.satisfies(PermissionLevel::Edit));
/// assert!(!PermissionLevel::Provider.satisfies(PermissionLevel::Admin));
/// assert!(!PermissionLevel::Admin.satisfies(PermissionLevel::Provider));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// No level. Never satisfies a check.
    Unspecified,

    /// View the resource and its metadata.
    Read,

    /// Modify the resource contents.
    Edit,

    /// Manage the resource, including its ACL.
    Admin,

    /// Platform-operator override, granted only by the platform.
    Provider,
}

impl PermissionLevel {
    /// Get the string representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Unspecified => "unspecified",
            PermissionLevel::Read => "read",
            PermissionLevel::Edit => "edit",
            PermissionLevel::Admin => "admin",
            PermissionLevel::Provider => "provider",
        }
    }

    /// Parse a level from its string representation (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::PermissionLevel;
    ///
    /// assert_eq!(PermissionLevel::parse("EDIT"), Some(PermissionLevel::Edit));
    /// assert_eq!(PermissionLevel::parse("owner"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unspecified" => Some(PermissionLevel::Unspecified),
            "read" => Some(PermissionLevel::Read),
            "edit" => Some(PermissionLevel::Edit),
            "admin" => Some(PermissionLevel::Admin),
            "provider" => Some(PermissionLevel::Provider),
            _ => None,
        }
    }

    /// Get the interoperable wire value.
    pub fn wire_value(&self) -> i32 {
        match self {
            PermissionLevel::Unspecified => 0,
            PermissionLevel::Read => 1,
            PermissionLevel::Edit => 2,
            PermissionLevel::Admin => 3,
            PermissionLevel::Provider => 4,
        }
    }

    /// Decode a wire value.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::InvalidPermission`] for values outside `0..=4`.
    pub fn from_wire(value: i32) -> AclResult<Self> {
        match value {
            0 => Ok(PermissionLevel::Unspecified),
            1 => Ok(PermissionLevel::Read),
            2 => Ok(PermissionLevel::Edit),
            3 => Ok(PermissionLevel::Admin),
            4 => Ok(PermissionLevel::Provider),
            other => Err(AclError::InvalidPermission(format!(
                "unknown permission value {}",
                other
            ))),
        }
    }

    /// Position in the `Read < Edit < Admin` hierarchy.
    ///
    /// `Unspecified` and `Provider` are not part of the hierarchy.
    fn hierarchy_rank(&self) -> Option<u8> {
        match self {
            PermissionLevel::Read => Some(1),
            PermissionLevel::Edit => Some(2),
            PermissionLevel::Admin => Some(3),
            PermissionLevel::Unspecified | PermissionLevel::Provider => None,
        }
    }

    /// Check if holding this level satisfies a check for `required`.
    ///
    /// - Within the hierarchy, a higher level satisfies a lower one.
    /// - `Provider` is satisfied only by `Provider`, and satisfies nothing else.
    /// - `Unspecified` is never satisfied and satisfies nothing.
    pub fn satisfies(&self, required: PermissionLevel) -> bool {
        if required == PermissionLevel::Provider {
            return *self == PermissionLevel::Provider;
        }
        match (self.hierarchy_rank(), required.hierarchy_rank()) {
            (Some(held), Some(needed)) => held >= needed,
            _ => false,
        }
    }

    /// Check if this level may appear in an ACL entry.
    pub fn is_grantable(&self) -> bool {
        self.hierarchy_rank().is_some()
    }

    /// Get all levels, including the non-grantable ones.
    pub fn all() -> Vec<Self> {
        vec![
            PermissionLevel::Unspecified,
            PermissionLevel::Read,
            PermissionLevel::Edit,
            PermissionLevel::Admin,
            PermissionLevel::Provider,
        ]
    }
}

/// A set of permission levels.
///
/// The set stores literal grants. Holding `Admin` does not add `Read` to the
/// set; use [`PermissionSet::has_at_least`] for authorization decisions.
///
/// # Example
///
/// ```
/// use platform_acl::{PermissionLevel, PermissionSet};
///
/// let set = PermissionSet::from_levels([PermissionLevel::Admin]);
/// assert!(set.has_at_least(PermissionLevel::Read));
/// assert!(!set.contains(PermissionLevel::Read));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PermissionSet {
    levels: BTreeSet<PermissionLevel>,
}

impl PermissionSet {
    /// Create a new empty set.
    pub fn new() -> Self {
        Self {
            levels: BTreeSet::new(),
        }
    }

    /// The set implicitly held by a resource owner.
    pub fn owner() -> Self {
        Self::from_levels([
            PermissionLevel::Read,
            PermissionLevel::Edit,
            PermissionLevel::Admin,
        ])
    }

    /// Build a set from levels. Duplicates collapse.
    pub fn from_levels<I>(levels: I) -> Self
    where
        I: IntoIterator<Item = PermissionLevel>,
    {
        Self {
            levels: levels.into_iter().collect(),
        }
    }

    /// Decode a list of wire values.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::InvalidPermission`] on the first unknown value.
    pub fn from_wire(values: &[i32]) -> AclResult<Self> {
        values
            .iter()
            .map(|v| PermissionLevel::from_wire(*v))
            .collect::<AclResult<BTreeSet<_>>>()
            .map(|levels| Self { levels })
    }

    /// Encode as wire values, lowest level first.
    pub fn to_wire(&self) -> Vec<i32> {
        self.levels.iter().map(|l| l.wire_value()).collect()
    }

    /// Add a level. Returns `true` if it was not present.
    pub fn insert(&mut self, level: PermissionLevel) -> bool {
        self.levels.insert(level)
    }

    /// Merge another set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.levels.extend(other.levels.iter().copied());
    }

    /// Check for a literal grant.
    pub fn contains(&self, level: PermissionLevel) -> bool {
        self.levels.contains(&level)
    }

    /// Check if any held level satisfies `required`.
    pub fn has_at_least(&self, required: PermissionLevel) -> bool {
        has_at_least(required, self)
    }

    /// Iterate over the levels, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = PermissionLevel> + '_ {
        self.levels.iter().copied()
    }

    /// Collect the levels into a vector, lowest first.
    pub fn to_vec(&self) -> Vec<PermissionLevel> {
        self.iter().collect()
    }

    /// Get the count of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<PermissionLevel> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = PermissionLevel>>(iter: T) -> Self {
        Self::from_levels(iter)
    }
}

/// Hierarchy check over a set of held levels.
///
/// `true` if at least one level in `held` satisfies `required`.
pub fn has_at_least(required: PermissionLevel, held: &PermissionSet) -> bool {
    held.iter().any(|level| level.satisfies(required))
}
