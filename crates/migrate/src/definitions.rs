//! Migration Definitions - Core types and structures for migrations
//!
//! Defines the record shape persisted in the metadata index, the kind
//! taxonomy that determines revert strategy, and the result types the
//! orchestrator reports.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Category of schema change a migration performs.
///
/// Determines how a revert statement is synthesized; `alter` has no
/// derivable inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MigrationKind {
    Table,
    Function,
    Trigger,
    Index,
    Alter,
}

impl MigrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Function => "function",
            Self::Trigger => "trigger",
            Self::Index => "index",
            Self::Alter => "alter",
        }
    }
}

impl fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a recorded migration has been applied to the database.
///
/// Transitions recorded -> applied; a reverted migration is removed
/// outright rather than given a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MigrationStatus {
    Recorded,
    Applied { applied_at: DateTime<Utc> },
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

impl Default for MigrationStatus {
    fn default() -> Self {
        Self::Recorded
    }
}

/// Structured inverse recorded at creation time.
///
/// Revert prefers this lookup over re-parsing the forward SQL; records
/// created from SQL with no derivable inverse carry `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RevertPlan {
    DropTable { name: String },
    DropFunction { name: String },
    DropTrigger { name: String, table: String },
    DropIndex { name: String },
}

impl RevertPlan {
    /// Render the undo statement
    pub fn to_sql(&self) -> String {
        match self {
            Self::DropTable { name } => format!("DROP TABLE IF EXISTS {}", name),
            Self::DropFunction { name } => format!("DROP FUNCTION IF EXISTS {}", name),
            Self::DropTrigger { name, table } => {
                format!("DROP TRIGGER IF EXISTS {} ON {}", name, table)
            }
            Self::DropIndex { name } => format!("DROP INDEX IF EXISTS {}", name),
        }
    }
}

/// The unit of change history.
///
/// Immutable once recorded; `sql` is the forensic record of what ran,
/// not a template, and `checksum` is its digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Unique identifier, lexicographically ordered with creation time
    pub id: String,
    /// Human-readable label derived from kind and creation time
    pub name: String,
    /// When the migration was created
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// The exact SQL statement that was executed
    pub sql: String,
    /// Kind of schema change, determines revert strategy
    #[serde(rename = "type")]
    pub kind: MigrationKind,
    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hex-encoded SHA-256 digest of `sql`
    pub checksum: String,
    /// Structured inverse recorded at creation, when derivable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert: Option<RevertPlan>,
    /// Applied/recorded state
    #[serde(default)]
    pub status: MigrationStatus,
}

/// Index document persisted as the metadata index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationIndex {
    pub migrations: Vec<MigrationRecord>,
}

/// Configuration for the migration store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the index and per-migration SQL files
    pub migrations_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            migrations_dir: PathBuf::from("migrations"),
        }
    }
}

/// Result of applying pending migrations
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    /// Number of migrations that were applied
    pub applied_count: usize,
    /// IDs of migrations that were applied, in order
    pub applied_migrations: Vec<String>,
    /// Number of migrations skipped because they were already applied
    pub skipped_count: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
}

/// Result of reverting a migration
#[derive(Debug, Clone, Serialize)]
pub struct Reverted {
    /// The record that was removed from the store
    pub record: MigrationRecord,
    /// The undo statement that was executed
    pub revert_sql: String,
}
