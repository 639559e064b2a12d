//! # Listing Flags
//!
//! Caller-supplied filter and hide predicates for browsing resources.
//!
//! - `filter_*` fields are allow-lists: when set, a resource must match.
//! - `hide_*` fields are deny-lists: when set, a matching resource is dropped.
//!
//! Empty strings, empty id lists and absent timestamps count as unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metadata::{timestamp_from_millis, ResourceId};

/// Filter/hide specification for a listing.
///
/// # Example
///
/// ```
/// use platform_listing::ListingFlags;
///
/// let flags = ListingFlags::new()
///     .filter_created_by("alice")
///     .hide_product_category("scratch")
///     .include_others(true);
///
/// assert_eq!(flags.filter_created_by.as_deref(), Some("alice"));
/// assert!(flags.include_others);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListingFlags {
    /// Populate the full ACL for callers holding `Admin`
    pub include_others: bool,
    /// Forwarded: attach update history
    pub include_updates: bool,
    /// Forwarded: attach support information
    pub include_support: bool,
    /// Forwarded: attach the resolved product
    pub include_product: bool,

    /// Only resources created by this actor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_created_by: Option<String>,
    /// Only resources created strictly after this instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_created_after: Option<DateTime<Utc>>,
    /// Only resources created strictly before this instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_created_before: Option<DateTime<Utc>>,
    /// Only resources backed by this product id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_product_id: Option<String>,
    /// Only resources backed by this product category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_product_category: Option<String>,
    /// Only resources backed by this provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_product_provider: Option<String>,
    /// Only resources with one of these ids
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter_ids: Vec<ResourceId>,

    /// Drop resources created by this actor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_created_by: Option<String>,
    /// Drop resources backed by this product id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_product_id: Option<String>,
    /// Drop resources backed by this product category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_product_category: Option<String>,
    /// Drop resources backed by this provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_product_provider: Option<String>,
}

/// Toggles the listing engine forwards to the backend without interpreting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForwardedIncludes {
    /// Attach update history
    pub include_updates: bool,
    /// Attach support information
    pub include_support: bool,
    /// Attach the resolved product
    pub include_product: bool,
}

impl ListingFlags {
    /// Flags that match every readable resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles for the backend.
    pub fn forwarded(&self) -> ForwardedIncludes {
        ForwardedIncludes {
            include_updates: self.include_updates,
            include_support: self.include_support,
            include_product: self.include_product,
        }
    }

    /// Set `include_others`.
    pub fn include_others(mut self, include: bool) -> Self {
        self.include_others = include;
        self
    }

    /// Set `include_updates`.
    pub fn include_updates(mut self, include: bool) -> Self {
        self.include_updates = include;
        self
    }

    /// Set `include_support`.
    pub fn include_support(mut self, include: bool) -> Self {
        self.include_support = include;
        self
    }

    /// Set `include_product`.
    pub fn include_product(mut self, include: bool) -> Self {
        self.include_product = include;
        self
    }

    /// Keep only resources created by `actor_id`.
    pub fn filter_created_by(mut self, actor_id: impl Into<String>) -> Self {
        self.filter_created_by = Some(actor_id.into());
        self
    }

    /// Keep only resources created strictly after `instant`.
    pub fn filter_created_after(mut self, instant: DateTime<Utc>) -> Self {
        self.filter_created_after = Some(instant);
        self
    }

    /// Keep only resources created strictly before `instant`.
    pub fn filter_created_before(mut self, instant: DateTime<Utc>) -> Self {
        self.filter_created_before = Some(instant);
        self
    }

    /// Set both creation bounds from wire milliseconds; `0` leaves a bound unset.
    pub fn created_between_millis(mut self, after: i64, before: i64) -> Self {
        self.filter_created_after = timestamp_from_millis(after);
        self.filter_created_before = timestamp_from_millis(before);
        self
    }

    /// Keep only resources backed by `product_id`.
    pub fn filter_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.filter_product_id = Some(product_id.into());
        self
    }

    /// Keep only resources in `category`.
    pub fn filter_product_category(mut self, category: impl Into<String>) -> Self {
        self.filter_product_category = Some(category.into());
        self
    }

    /// Keep only resources offered by `provider`.
    pub fn filter_product_provider(mut self, provider: impl Into<String>) -> Self {
        self.filter_product_provider = Some(provider.into());
        self
    }

    /// Keep only resources whose id is in `ids`.
    pub fn filter_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ResourceId>,
    {
        self.filter_ids = ids.into_iter().collect();
        self
    }

    /// Drop resources created by `actor_id`.
    pub fn hide_created_by(mut self, actor_id: impl Into<String>) -> Self {
        self.hide_created_by = Some(actor_id.into());
        self
    }

    /// Drop resources backed by `product_id`.
    pub fn hide_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.hide_product_id = Some(product_id.into());
        self
    }

    /// Drop resources in `category`.
    pub fn hide_product_category(mut self, category: impl Into<String>) -> Self {
        self.hide_product_category = Some(category.into());
        self
    }

    /// Drop resources offered by `provider`.
    pub fn hide_product_provider(mut self, provider: impl Into<String>) -> Self {
        self.hide_product_provider = Some(provider.into());
        self
    }
}

/// A string predicate counts as set only when present and non-empty.
pub(crate) fn set_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags_are_unset() {
        let flags = ListingFlags::new();

        assert!(!flags.include_others);
        assert!(flags.filter_created_by.is_none());
        assert!(flags.filter_ids.is_empty());
        assert_eq!(flags.forwarded(), ForwardedIncludes::default());
    }

    #[test]
    fn test_empty_strings_are_unset() {
        assert_eq!(set_value(&Some(String::new())), None);
        assert_eq!(set_value(&None), None);
        assert_eq!(set_value(&Some("x".to_string())), Some("x"));
    }

    #[test]
    fn test_zero_millis_leave_bounds_unset() {
        let flags = ListingFlags::new().created_between_millis(0, 5_000);

        assert!(flags.filter_created_after.is_none());
        assert_eq!(flags.filter_created_before.unwrap().timestamp_millis(), 5_000);
    }

    #[test]
    fn test_forwarded_includes() {
        let flags = ListingFlags::new()
            .include_updates(true)
            .include_product(true);

        let forwarded = flags.forwarded();
        assert!(forwarded.include_updates);
        assert!(!forwarded.include_support);
        assert!(forwarded.include_product);
    }

    #[test]
    fn test_deserialize_partial_flags() {
        let flags: ListingFlags =
            serde_json::from_str(r#"{"include_others":true,"filter_ids":[1,2]}"#).unwrap();

        assert!(flags.include_others);
        assert_eq!(flags.filter_ids, vec![1, 2]);
        assert!(flags.hide_product_id.is_none());
    }
}
