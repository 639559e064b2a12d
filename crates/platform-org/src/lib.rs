//! # Platform Actor Identity
//!
//! This crate describes *who* is asking when a drive is created, browsed or
//! shared. Authentication happens upstream; by the time a request reaches the
//! drive service the caller has already been established and is represented
//! here as an [`Actor`].
//!
//! ## Overview
//!
//! The platform-org crate handles:
//! - **Actors**: The user id, the active project context and provider identity
//! - **Group memberships**: `(project, group)` pairs used by ACL group grants
//! - **Identity providers**: Resolving an actor id into a full [`Actor`]
//!
//! ## Architecture
//!
//! ```text
//! Actor
//!   ├─ id                (user identifier)
//!   ├─ project           (active project context, if any)
//!   ├─ groups            (GroupMembership: project + group)
//!   └─ provider          (provider the actor operates for, platform-granted)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use platform_org::Actor;
//!
//! let actor = Actor::new("alice")
//!     .with_project("proj-1")
//!     .with_group("proj-1", "researchers");
//!
//! assert!(actor.is_in_project_context("proj-1"));
//! assert!(actor.belongs_to_group("proj-1", "researchers"));
//! assert!(!actor.belongs_to_group("proj-2", "researchers"));
//! ```
//!
//! ## Cross-Crate Integration
//!
//! - `platform-acl`: effective permissions are computed for an `Actor`
//! - `platform-drives`: the drive service resolves actors through an
//!   [`IdentityProvider`]

pub mod actor;
pub mod identity;
pub mod membership;

// Re-export main types for convenience
pub use actor::Actor;
pub use identity::{IdentityProvider, StaticIdentityProvider};
pub use membership::GroupMembership;
