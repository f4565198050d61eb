//! Error types for the migration system

use thiserror::Error;

/// Result type alias for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Error types for migration operations
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration not found: {id}")]
    NotFound { id: String },

    #[error("No revert strategy for migration type '{kind}'")]
    UnsupportedKind { kind: String },

    #[error("Checksum mismatch for migration {id}: recorded SQL does not match its digest")]
    IntegrityMismatch { id: String },

    #[error("Migration {id} failed: {message}")]
    Execution { id: String, message: String },

    #[error("Migration store error: {message}")]
    Store { message: String },

    #[error("Could not derive revert SQL: {detail}")]
    RevertSynthesis { detail: String },
}

impl MigrationError {
    /// Create a new not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a new unsupported-kind error
    pub fn unsupported_kind(kind: impl ToString) -> Self {
        Self::UnsupportedKind {
            kind: kind.to_string(),
        }
    }

    /// Create a new integrity-mismatch error
    pub fn integrity_mismatch(id: impl Into<String>) -> Self {
        Self::IntegrityMismatch { id: id.into() }
    }

    /// Create a new execution error, preserving the database error text verbatim
    pub fn execution(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a new revert-synthesis error
    pub fn revert_synthesis(detail: impl Into<String>) -> Self {
        Self::RevertSynthesis {
            detail: detail.into(),
        }
    }
}

impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        Self::Store {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store {
            message: format!("Index serialization failed: {}", err),
        }
    }
}
