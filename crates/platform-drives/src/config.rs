//! Drive service configuration.
//!
//! Paging limits, the duplicate-key policy for ACL updates and event bus
//! sizing. Values are loaded from environment variables with defaults
//! suitable for local development.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use platform_acl::DuplicateKeyPolicy;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Drive service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriveServiceConfig {
    /// Page size when a browse request does not ask for one.
    pub default_page_size: usize,

    /// Upper bound on requested page sizes.
    pub max_page_size: usize,

    /// Treatment of repeated keys within one ACL update.
    pub duplicate_keys: DuplicateKeyPolicy,

    /// Buffer size of each event bus channel.
    pub event_channel_capacity: usize,
}

impl Default for DriveServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 250,
            duplicate_keys: DuplicateKeyPolicy::LastWriteWins,
            event_channel_capacity: 1024,
        }
    }
}

impl DriveServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DRIVES_DEFAULT_PAGE_SIZE`: Page size for browse (default: 50)
    /// - `DRIVES_MAX_PAGE_SIZE`: Largest page a caller may request (default: 250)
    /// - `DRIVES_DUPLICATE_KEYS`: `last_write_wins` or `reject` (default: last_write_wins)
    /// - `DRIVES_EVENT_CHANNEL_CAPACITY`: Event channel buffer (default: 1024)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset keys fall back to defaults; present but unparsable values are
    /// rejected. The result is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let config = Self {
            default_page_size: parse_usize(&lookup, "DRIVES_DEFAULT_PAGE_SIZE")?
                .unwrap_or(default.default_page_size),
            max_page_size: parse_usize(&lookup, "DRIVES_MAX_PAGE_SIZE")?
                .unwrap_or(default.max_page_size),
            duplicate_keys: match lookup("DRIVES_DUPLICATE_KEYS") {
                Some(raw) => DuplicateKeyPolicy::parse(raw.trim()).ok_or_else(|| {
                    ConfigError::invalid(
                        "DRIVES_DUPLICATE_KEYS",
                        format!("expected last_write_wins or reject, got {:?}", raw),
                    )
                })?,
                None => default.duplicate_keys,
            },
            event_channel_capacity: parse_usize(&lookup, "DRIVES_EVENT_CHANNEL_CAPACITY")?
                .unwrap_or(default.event_channel_capacity),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::invalid("DRIVES_DEFAULT_PAGE_SIZE", "must be positive"));
        }
        if self.max_page_size < self.default_page_size {
            return Err(ConfigError::invalid(
                "DRIVES_MAX_PAGE_SIZE",
                format!("must be at least the default page size ({})", self.default_page_size),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::invalid("DRIVES_EVENT_CHANNEL_CAPACITY", "must be positive"));
        }
        Ok(())
    }

    /// Effective page size for a request; zero or absent means the default.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(n) if n > 0 => n.min(self.max_page_size),
            _ => self.default_page_size,
        }
    }
}

fn parse_usize<F>(lookup: &F, key: &str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::invalid(key, format!("not a number: {:?}", raw)))
        })
        .transpose()
}
