//! Resource metadata models
//!
//! This module provides the metadata view returned to callers: who owns a
//! resource, which product backs it, and what the caller may do with it.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use platform_acl::{AclEntry, Owner, PermissionSet};

/// Resource identifier, unique per resource type.
pub type ResourceId = i64;

/// Reference to the product that backs a resource.
///
/// # Examples
///
/// ```
/// use platform_listing::ProductReference;
///
/// let product = ProductReference::new("u1-cephfs", "u1-cephfs_credits", "ucloud");
/// assert_eq!(product.provider, "ucloud");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProductReference {
    /// Product identifier
    pub id: String,

    /// Product category
    pub category: String,

    /// Provider that offers the product
    pub provider: String,
}

impl ProductReference {
    /// Creates a new product reference.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            provider: provider.into(),
        }
    }
}

/// What the caller may do with a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permissions {
    /// Literal levels the caller holds
    pub myself: PermissionSet,

    /// The full ACL; only populated for callers allowed to see it
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub others: Vec<AclEntry>,
}

/// Metadata of a resource as seen by one caller.
///
/// The `permissions` field is caller-specific. Stores keep it empty and the
/// listing engine fills it in per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    /// Resource identifier
    pub id: ResourceId,

    /// When the resource was created
    pub created_at: DateTime<Utc>,

    /// Immutable owner
    pub owner: Owner,

    /// Product backing the resource
    pub product: ProductReference,

    /// Caller-specific permissions view
    #[serde(default)]
    pub permissions: Permissions,
}

impl Metadata {
    /// Creates metadata with an empty permissions view.
    pub fn new(
        id: ResourceId,
        created_at: DateTime<Utc>,
        owner: Owner,
        product: ProductReference,
    ) -> Self {
        Self {
            id,
            created_at,
            owner,
            product,
            permissions: Permissions::default(),
        }
    }
}

/// Convert a wire timestamp in epoch milliseconds.
///
/// Zero means "unset" on the wire and yields `None`, as do values outside the
/// representable range.
///
/// # Examples
///
/// ```
/// use platform_listing::timestamp_from_millis;
///
/// assert!(timestamp_from_millis(0).is_none());
/// assert_eq!(timestamp_from_millis(1_000).unwrap().timestamp(), 1);
/// ```
pub fn timestamp_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    if millis == 0 {
        return None;
    }
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_starts_without_permissions() {
        let metadata = Metadata::new(
            7,
            Utc::now(),
            Owner::new("bob", ""),
            ProductReference::new("p", "c", "prov"),
        );

        assert!(metadata.permissions.myself.is_empty());
        assert!(metadata.permissions.others.is_empty());
    }

    #[test]
    fn test_others_omitted_when_empty() {
        let permissions = Permissions::default();
        let json = serde_json::to_value(&permissions).unwrap();

        assert!(json.get("others").is_none());
        assert_eq!(json["myself"], serde_json::json!([]));
    }

    #[test]
    fn test_timestamp_from_millis() {
        assert_eq!(timestamp_from_millis(0), None);
        let ts = timestamp_from_millis(1_700_000_000_123).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_123);
    }
}
