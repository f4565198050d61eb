//! Error types for the tool surface

use thiserror::Error;

use pgforge_db::DbError;
use pgforge_migrate::MigrationError;

/// Result type alias for tool operations
pub type ToolResult<T> = Result<T, ToolError>;

/// Error types for tool dispatch and execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid parameters for '{tool}': {message}")]
    InvalidParams { tool: String, message: String },

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolError {
    /// Create a new invalid-parameters error
    pub fn invalid_params(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
