//! CREATE TABLE builder

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Column definition for CREATE TABLE and ALTER TABLE ADD COLUMN
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// SQL type, e.g. "VARCHAR(255)", "SERIAL", "TIMESTAMPTZ"
    #[serde(rename = "type")]
    pub sql_type: String,
    /// Whether NULL values are allowed (defaults to true)
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// DEFAULT expression, emitted verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
}

fn default_nullable() -> bool {
    true
}

/// Table definition for CREATE TABLE
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableSpec {
    /// Table name, optionally schema-qualified
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    /// Raw table-level constraints, e.g. "UNIQUE (email)"
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub if_not_exists: bool,
}

/// Build the CREATE TABLE statement
pub fn build_create_table(spec: &TableSpec) -> String {
    let mut parts: Vec<String> = spec.columns.iter().map(column_sql).collect();
    parts.extend(spec.constraints.iter().cloned());

    format!(
        "CREATE TABLE {}{} (\n    {}\n)",
        if spec.if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        },
        spec.name,
        parts.join(",\n    ")
    )
}

fn column_sql(column: &ColumnSpec) -> String {
    let mut sql = format!("{} {}", column.name, column.sql_type);
    if column.primary_key {
        sql.push_str(" PRIMARY KEY");
    }
    if column.unique {
        sql.push_str(" UNIQUE");
    }
    if !column.nullable && !column.primary_key {
        sql.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(default);
    }
    sql
}
