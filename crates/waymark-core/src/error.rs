//! Error types for the waymark library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::LocationId;

/// Error type for all registry, store and navigation operations.
///
/// Failures of the primary (remote) store never appear here: they are
/// absorbed by [`crate::store::LocationStore`] and only show up in the logs.
#[derive(Error, Debug)]
pub enum WaymarkError {
    /// Local store failures (SQLite open, query or transaction errors)
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// No tagged location exists for the given ID
    #[error("Location with ID {id} not found")]
    NotFound { id: LocationId },
    /// Navigation target could not be resolved
    #[error("Navigation target {id} not found")]
    TargetNotFound { id: LocationId },
    /// Navigation was requested before any position sample was available
    #[error("Current position is not available")]
    NoCurrentPosition,
    /// The positioning source failed to produce a sample
    #[error("Position unavailable: {reason}")]
    PositionUnavailable { reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating persistence errors with optional context.
pub struct PersistenceErrorBuilder {
    message: String,
}

impl PersistenceErrorBuilder {
    /// Create a new persistence error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> WaymarkError {
        WaymarkError::Persistence {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WaymarkError {
        WaymarkError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WaymarkError {
    /// Creates a builder for persistence errors.
    pub fn persistence(message: impl Into<String>) -> PersistenceErrorBuilder {
        PersistenceErrorBuilder::new(message)
    }

    /// Creates a builder for invalid input errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a `spawn_blocking` join failure.
    pub(crate) fn join(err: tokio::task::JoinError) -> Self {
        WaymarkError::Configuration {
            message: format!("Task join error: {err}"),
        }
    }
}

/// Extension trait for mapping rusqlite results into persistence errors.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WaymarkError::persistence(message).with_source(e))
    }
}

/// Result type alias for waymark operations
pub type Result<T> = std::result::Result<T, WaymarkError>;
