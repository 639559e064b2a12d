//! # Platform ACL
//!
//! This crate provides the permission model and access-control lists for
//! platform resources such as storage drives.
//!
//! ## Overview
//!
//! The platform-acl crate handles:
//! - **Permission levels**: `Read < Edit < Admin`, plus the independent
//!   platform-granted `Provider` level
//! - **Effective permissions**: What an actor holds, from ownership and grants
//! - **ACL entries**: Grants to users and project groups, unique per identity key
//! - **ACL deltas**: All-or-nothing add/remove updates
//!
//! ## Architecture
//!
//! ```text
//! EffectivePermissions(actor, owner, acl)
//!   ├─ owner?            -> {Read, Edit, Admin}
//!   └─ otherwise         -> ∪ permissions of entries applying to actor
//!
//! Acl::apply(delta)      -> new Acl (original untouched on error)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use platform_acl::{
//!     effective_permissions, Acl, AclEntry, AclUpdate, EntityKey, Owner, PermissionLevel,
//! };
//! use platform_org::Actor;
//!
//! let owner = Owner::new("bob", "");
//! let acl = Acl::new()
//!     .apply(&AclUpdate::new().grant(AclEntry::user("alice", [PermissionLevel::Edit])))
//!     .unwrap();
//!
//! let held = effective_permissions(&Actor::new("alice"), &owner, &acl);
//! assert!(held.has_at_least(PermissionLevel::Read));
//! assert!(!held.has_at_least(PermissionLevel::Admin));
//!
//! // Deleting a key that is not present fails and changes nothing
//! let err = acl.apply(&AclUpdate::new().revoke(EntityKey::user("carol")));
//! assert!(err.is_err());
//! ```
//!
//! ## Provider Level
//!
//! `Provider` is never granted through an ACL entry and never implies
//! `Admin`. The drive service adds it when the platform says the caller acts
//! for the provider backing a resource.

pub mod effective;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod owner;
pub mod permission;

// Re-export main types for convenience
pub use effective::effective_permissions;
pub use entry::{AclEntry, EntityKey, EntityType};
pub use error::{AclError, AclResult};
pub use ledger::{Acl, AclUpdate, DuplicateKeyPolicy};
pub use owner::Owner;
pub use permission::{has_at_least, PermissionLevel, PermissionSet};
