//! Drive service error types

use thiserror::Error;

use platform_acl::AclError;
use platform_listing::ResourceId;

use crate::config::ConfigError;

/// Drive service errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriveError {
    /// Drive does not exist or the caller cannot read it
    #[error("Drive not found: {0}")]
    NotFound(ResourceId),

    /// The identity provider does not know the caller
    #[error("Unknown actor: {0}")]
    UnknownActor(String),

    /// Caller can read the drive but lacks the required level
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Malformed request
    #[error("Validation error: {0}")]
    Validation(String),

    /// ACL ledger rejected the update
    #[error(transparent)]
    Acl(#[from] AclError),

    /// Service misconfigured
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for drive operations.
pub type DriveResult<T> = Result<T, DriveError>;

impl DriveError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DriveError::NotFound(_) => 404,
            DriveError::UnknownActor(_) => 401,
            DriveError::PermissionDenied(_) => 403,
            DriveError::Validation(_) => 422,
            DriveError::Acl(e) => e.status_code(),
            DriveError::Config(_) => 500,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            DriveError::NotFound(_) => "NOT_FOUND",
            DriveError::UnknownActor(_) => "UNAUTHENTICATED",
            DriveError::PermissionDenied(_) => "PERMISSION_DENIED",
            DriveError::Validation(_) => "VALIDATION_ERROR",
            DriveError::Acl(e) => e.error_code(),
            DriveError::Config(_) => "CONFIG_ERROR",
        }
    }
}
