//! Core error types for mornin-core.
//!
//! The schedule engine itself never fails for data reasons. Errors come from
//! three places: reading and writing configuration, talking to the external
//! providers, and validating what the user typed.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for mornin-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External provider errors (routing, geocoding, weather)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be determined or created
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Errors raised by the external provider adapters.
///
/// The planner never lets these reach the engine: each one is turned into a
/// degraded snapshot carrying the error text.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key configured for the service
    #[error("No API key configured for {service}")]
    MissingApiKey { service: &'static str },

    /// Transport-level failure (DNS, TLS, timeout, ...)
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("{service} API error: HTTP {status}")]
    Status { service: &'static str, status: u16 },

    /// Response body did not have the expected shape
    #[error("{service} returned an unexpected response: {message}")]
    Malformed { service: &'static str, message: String },

    /// The query produced no result (address not found, no route)
    #[error("{0}")]
    NotFound(String),

    /// The provider cannot answer at all (e.g. no position fix)
    #[error("{0}")]
    Unavailable(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// A schedule was requested without a destination
    #[error("A destination is required before a wake-up time can be calculated")]
    DestinationRequired,

    /// Sleeper profile key not in the table
    #[error("Unknown sleeper profile '{0}' (expected heavy-sleeper, normal, light-sleeper or always-late)")]
    UnknownProfile(String),
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
