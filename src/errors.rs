//! Error types for newsfeed_sync
//!
//! This module defines the error types for all components of the application.
//! Transport and decode failures are kept apart from local persistence failures
//! so the sync orchestrator can decide which ones end a run.

use std::path::PathBuf;
use thiserror::Error;

/// Remote fetch errors (transport and decoding)
///
/// The message is informational only; callers never match on its content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection failure, timeout or non-success HTTP status
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Malformed or empty response body
    #[error("Decode error: {message}")]
    Decode { message: String },
}

impl FetchError {
    /// Create a transport error with a message
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error with a message
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::decode(error.to_string())
        } else {
            Self::transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}

/// Cache management errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache directory not found or inaccessible
    #[error("Cache directory not accessible: {path}")]
    DirectoryNotAccessible { path: PathBuf },

    /// File I/O error on a cache entry
    #[error("Cache I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key that cannot be used as a plain file name
    #[error("Invalid cache key: {key:?}")]
    InvalidKey { key: String },

    /// Value could not be serialized for storage
    #[error("Failed to serialize cache entry {key}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// One or more entries could not be removed during a clear
    #[error("Cache clear failed for {} path(s): {}", .failures.len(), format_failures(.failures))]
    ClearFailed { failures: Vec<(PathBuf, String)> },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_failures(failures: &[(PathBuf, String)]) -> String {
    failures
        .iter()
        .map(|(path, reason)| format!("{} ({})", path.display(), reason))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that end a sync run
#[derive(Error, Debug)]
pub enum SyncError {
    /// The category index could not be fetched
    #[error("Failed to fetch category index: {0}")]
    IndexFetch(#[source] FetchError),

    /// The cache could not be prepared for new data
    #[error("Cache failure during sync: {0}")]
    Cache(#[from] CacheError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Could not determine or access a configuration location
    #[error("Configuration I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Remote fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Cache error
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Sync run error
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable by re-running the operation later
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Fetch(FetchError::Transport { .. })
            | AppError::Sync(SyncError::IndexFetch(FetchError::Transport { .. }))
            | AppError::Cache(CacheError::Io { .. })
            | AppError::Cache(CacheError::ClearFailed { .. }) => true,

            AppError::Fetch(FetchError::Decode { .. })
            | AppError::Sync(SyncError::IndexFetch(FetchError::Decode { .. }))
            | AppError::Cache(CacheError::InvalidKey { .. })
            | AppError::Config(_) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "fetch",
            AppError::Cache(_) => "cache",
            AppError::Sync(_) => "sync",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Cache result type alias
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Sync result type alias
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
