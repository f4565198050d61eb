//! Schema introspection resources
//!
//! Read-only lookups over `information_schema`, run through the executor's
//! rolled-back query path.

use serde_json::{json, Value};

use pgforge_db::Database;

use crate::error::ToolResult;

/// All schemas in the connected database
pub async fn list_schemas(database: &Database) -> ToolResult<Vec<Value>> {
    let rows = database
        .query(
            "SELECT schema_name FROM information_schema.schemata ORDER BY schema_name",
            &[],
        )
        .await?;
    Ok(rows)
}

/// Tables in a schema
pub async fn list_tables(database: &Database, schema: &str) -> ToolResult<Vec<Value>> {
    let rows = database
        .query(
            "SELECT table_name, table_type FROM information_schema.tables \
             WHERE table_schema = $1 ORDER BY table_name",
            &[json!(schema)],
        )
        .await?;
    Ok(rows)
}

/// Column definitions for a table
pub async fn describe_table(
    database: &Database,
    schema: &str,
    table: &str,
) -> ToolResult<Vec<Value>> {
    let rows = database
        .query(
            "SELECT column_name, data_type, is_nullable, column_default \
             FROM information_schema.columns \
             WHERE table_schema = $1 AND table_name = $2 \
             ORDER BY ordinal_position",
            &[json!(schema), json!(table)],
        )
        .await?;
    Ok(rows)
}
