//! # Listing Filter Engine
//!
//! Decides whether a resource belongs in a caller's listing and builds the
//! caller-specific metadata view.
//!
//! ```text
//! visible  = caller holds any permission
//! included = visible AND (every set filter_* matches)
//! listed   = included AND NOT (any set hide_* matches)
//! ```

use platform_acl::{Acl, PermissionLevel, PermissionSet};

use crate::flags::{set_value, ListingFlags};
use crate::metadata::{Metadata, Permissions};

/// Check whether a resource belongs in the caller's listing.
///
/// `caller` is the caller's effective permission set on the resource; an
/// empty set excludes the resource regardless of flags.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use platform_acl::{Owner, PermissionLevel, PermissionSet};
/// use platform_listing::{matches, ListingFlags, Metadata, ProductReference};
///
/// let resource = Metadata::new(
///     1,
///     Utc::now(),
///     Owner::new("alice", ""),
///     ProductReference::new("u1-cephfs", "storage", "ucloud"),
/// );
/// let caller = PermissionSet::from_levels([PermissionLevel::Read]);
///
/// let flags = ListingFlags::new().filter_created_by("alice");
/// assert!(matches(&resource, &flags, &caller));
///
/// let flags = flags.hide_product_category("storage");
/// assert!(!matches(&resource, &flags, &caller));
/// ```
pub fn matches(resource: &Metadata, flags: &ListingFlags, caller: &PermissionSet) -> bool {
    if caller.is_empty() {
        return false;
    }
    passes_filters(resource, flags) && !is_hidden(resource, flags)
}

/// Build the caller's view of a resource, or `None` if it is not listed.
///
/// - `permissions.myself` is the caller's literal permission set.
/// - `permissions.others` is the full ACL only when `include_others` is set
///   and the caller holds at least `Admin`; otherwise it is empty.
pub fn project_view(
    resource: &Metadata,
    acl: &Acl,
    flags: &ListingFlags,
    caller: &PermissionSet,
) -> Option<Metadata> {
    if !matches(resource, flags, caller) {
        return None;
    }

    let others = if flags.include_others && caller.has_at_least(PermissionLevel::Admin) {
        acl.entries().to_vec()
    } else {
        Vec::new()
    };

    let mut view = resource.clone();
    view.permissions = Permissions {
        myself: caller.clone(),
        others,
    };
    Some(view)
}

/// Every set `filter_*` predicate must match (logical AND).
fn passes_filters(resource: &Metadata, flags: &ListingFlags) -> bool {
    if let Some(created_by) = set_value(&flags.filter_created_by) {
        if resource.owner.created_by != created_by {
            return false;
        }
    }
    if let Some(after) = flags.filter_created_after {
        if resource.created_at <= after {
            return false;
        }
    }
    if let Some(before) = flags.filter_created_before {
        if resource.created_at >= before {
            return false;
        }
    }
    if let Some(id) = set_value(&flags.filter_product_id) {
        if resource.product.id != id {
            return false;
        }
    }
    if let Some(category) = set_value(&flags.filter_product_category) {
        if resource.product.category != category {
            return false;
        }
    }
    if let Some(provider) = set_value(&flags.filter_product_provider) {
        if resource.product.provider != provider {
            return false;
        }
    }
    if !flags.filter_ids.is_empty() && !flags.filter_ids.contains(&resource.id) {
        return false;
    }
    true
}

/// Any set `hide_*` predicate that matches drops the resource (logical OR).
fn is_hidden(resource: &Metadata, flags: &ListingFlags) -> bool {
    let hides = [
        (&flags.hide_created_by, resource.owner.created_by.as_str()),
        (&flags.hide_product_id, resource.product.id.as_str()),
        (&flags.hide_product_category, resource.product.category.as_str()),
        (&flags.hide_product_provider, resource.product.provider.as_str()),
    ];

    hides
        .iter()
        .any(|(hide, value)| set_value(hide).map_or(false, |h| h == *value))
}
