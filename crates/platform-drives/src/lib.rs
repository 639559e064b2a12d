//! # Platform Drives
//!
//! This crate provides the drive service: the request boundary where
//! identity, ACLs, listing filters and audit events come together.
//!
//! ## Overview
//!
//! The platform-drives crate handles:
//! - **Service**: `create`, `retrieve`, `browse`, `update_acl` and `delete`
//! - **Storage**: Copy-on-write snapshots with per-drive writer locks
//! - **Configuration**: Paging and duplicate-key policy from the environment
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use platform_acl::{AclEntry, AclUpdate, PermissionLevel};
//! use platform_drives::{BrowseRequest, CreateDriveRequest, DriveService, DriveServiceConfig};
//! use platform_listing::{ListingFlags, ProductReference};
//! use platform_org::{Actor, StaticIdentityProvider};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let identity = StaticIdentityProvider::new();
//!     identity.register(Actor::new("bob")).await;
//!     identity.register(Actor::new("alice")).await;
//!
//!     let service = DriveService::in_memory(DriveServiceConfig::from_env()?, Arc::new(identity))?;
//!
//!     let product = ProductReference::new("u1-cephfs", "u1-cephfs", "ucloud");
//!     let drive = service.create("bob", CreateDriveRequest::new(product)).await?;
//!
//!     let update = AclUpdate::new().grant(AclEntry::user("alice", [PermissionLevel::Read]));
//!     service.update_acl("bob", drive.id, update).await?;
//!
//!     let page = service.browse("alice", BrowseRequest::new(ListingFlags::new())).await?;
//!     assert_eq!(page.items.len(), 1);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use config::{ConfigError, DriveServiceConfig};
pub use error::{DriveError, DriveResult};
pub use service::DriveService;
pub use store::{Authorize, MemoryResourceStore, ResourceStore, StoredResource};
pub use types::{BrowseRequest, CreateDriveRequest, Page};
