//! Core error types for barista-core.
//!
//! The brew core itself only ever raises [`ValidationError`]; the other
//! variants belong to the collaborators around it (configuration, local
//! storage and the generative assistant).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for barista-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Assistant (generative AI) errors
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by the generative assistant client.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// No API key in config, environment, or keyring
    #[error("No API key configured. Run `barista auth set <key>` or set GEMINI_API_KEY")]
    MissingApiKey,

    /// Transport failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered but without usable content
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// The generated payload did not match the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Video generation finished without a playable URI
    #[error("Video generation failed or no URI returned")]
    NoVideo,

    /// Polling gave up
    #[error("Video generation still running after {polls} polls")]
    PollTimeout { polls: u32 },

    /// Credential store failure
    #[error("Keyring error: {0}")]
    Keyring(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Value outside an allowed range
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: String,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Steps are not gapless and non-overlapping
    #[error("Step {index} starts at {found}s but the previous step ends at {expected}s")]
    BrokenTimeline {
        index: usize,
        expected: u32,
        found: u32,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Lookup by id/name failed
    #[error("Unknown {kind}: {id}")]
    NotFound { kind: String, id: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<keyring::Error> for AssistantError {
    fn from(err: keyring::Error) -> Self {
        AssistantError::Keyring(err.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        CoreError::Assistant(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_bounds() {
        let err = ValidationError::OutOfRange {
            field: "total".into(),
            value: 30,
            min: 60,
            max: 600,
        };
        assert_eq!(err.to_string(), "total must be between 60 and 600 (got 30)");
    }

    #[test]
    fn validation_wraps_into_core_error() {
        let core: CoreError = ValidationError::EmptyCollection("steps".into()).into();
        assert!(matches!(core, CoreError::Validation(_)));
        assert_eq!(core.to_string(), "Validation error: Empty collection: steps");
    }
}
