//! Error types for permission and ACL operations
//!
//! All of these errors are logical outcomes of a request, not transient
//! faults. Callers surface them directly and never retry.

use thiserror::Error;

use crate::entry::EntityKey;

/// ACL and permission error types.
///
/// Messages name the offending identity key or permission value, which the
/// caller supplied itself. They never include other entries of the ACL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AclError {
    /// A delta asked to delete an entry that is not in the ACL
    #[error("ACL entry not found: {0}")]
    EntryNotFound(EntityKey),

    /// A permission or entity type value is malformed or not grantable
    #[error("Invalid permission: {0}")]
    InvalidPermission(String),

    /// The caller's effective permission is insufficient
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The delta is structurally invalid
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for ACL operations.
pub type AclResult<T> = Result<T, AclError>;

impl AclError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AclError::EntryNotFound(_) => 404,
            AclError::InvalidPermission(_) => 400,
            AclError::PermissionDenied(_) => 403,
            AclError::Validation(_) => 422,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AclError::EntryNotFound(_) => "NOT_FOUND",
            AclError::InvalidPermission(_) => "INVALID_PERMISSION",
            AclError::PermissionDenied(_) => "PERMISSION_DENIED",
            AclError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}
