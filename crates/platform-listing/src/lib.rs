//! # Platform Listing
//!
//! This crate decides which resources a caller sees when browsing, and what
//! permission detail those listings carry.
//!
//! ## Overview
//!
//! The platform-listing crate handles:
//! - **Metadata**: Owner, product and caller-specific permissions of a resource
//! - **Listing flags**: Filter (allow-list) and hide (deny-list) predicates
//! - **Filter engine**: Per-resource membership decisions and views
//!
//! ## Predicate Semantics
//!
//! | kind | combine | when unset |
//! |---|---|---|
//! | `filter_*` | AND | not applied |
//! | `hide_*` | OR, after filters | not applied |
//!
//! Creation-time bounds are strict. Resources the caller holds no permission
//! on are never listed.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use platform_acl::{Acl, Owner, PermissionSet};
//! use platform_listing::{project_view, ListingFlags, Metadata, ProductReference};
//!
//! let resource = Metadata::new(
//!     1,
//!     Utc::now(),
//!     Owner::new("bob", ""),
//!     ProductReference::new("u1-cephfs", "storage", "ucloud"),
//! );
//!
//! let flags = ListingFlags::new().include_others(true);
//! let view = project_view(&resource, &Acl::new(), &flags, &PermissionSet::owner());
//! assert!(view.is_some());
//! ```

pub mod filter;
pub mod flags;
pub mod metadata;

// Re-export main types for convenience
pub use filter::{matches, project_view};
pub use flags::{ForwardedIncludes, ListingFlags};
pub use metadata::{timestamp_from_millis, Metadata, Permissions, ProductReference, ResourceId};
