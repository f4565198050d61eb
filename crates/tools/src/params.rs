//! Tool parameter types
//!
//! Each tool's input shape, deserialized from caller-supplied JSON and
//! described to callers through the derived JSON schema.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use pgforge_migrate::{AlterOperation, FunctionSpec, IndexSpec, TableSpec, TriggerSpec};

/// Parameters for the read-only `query` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// SQL to run inside a read-only transaction
    pub sql: String,
    /// Positional parameters bound to $1, $2, ...
    #[serde(default)]
    pub params: Vec<Value>,
}

/// Parameters for the read-write `execute` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteParams {
    /// SQL to run inside a committed transaction
    pub sql: String,
    /// Positional parameters bound to $1, $2, ...
    #[serde(default)]
    pub params: Vec<Value>,
}

/// Parameters for `create_table`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTableParams {
    #[serde(flatten)]
    pub table: TableSpec,
    /// Free-text description recorded with the migration
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for `create_function`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateFunctionParams {
    #[serde(flatten)]
    pub function: FunctionSpec,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for `create_trigger`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTriggerParams {
    #[serde(flatten)]
    pub trigger: TriggerSpec,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for `create_index`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateIndexParams {
    #[serde(flatten)]
    pub index: IndexSpec,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for `alter_table`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AlterTableParams {
    /// Table to alter
    pub table: String,
    #[serde(flatten)]
    pub operation: AlterOperation,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for `list_migrations` (none)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListMigrationsParams {}

/// Parameters for `apply_migrations`
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ApplyMigrationsParams {
    /// Apply starting at this migration id (inclusive); everything when omitted
    #[serde(default)]
    pub from_id: Option<String>,
    /// Re-run migrations already marked applied
    #[serde(default)]
    pub force: bool,
}

/// Parameters for `revert_migration`
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RevertMigrationParams {
    /// Migration to revert; the most recent when omitted
    #[serde(default)]
    pub migration_id: Option<String>,
}
