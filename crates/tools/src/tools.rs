//! Tool definitions and dispatch
//!
//! Every mutating tool's response carries the exact SQL that was executed,
//! so a caller can independently verify what happened; failures surface
//! the underlying database error verbatim.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use pgforge_migrate::{
    build_alter_table, build_create_function, build_create_index, build_create_table,
    build_create_trigger, MigrationKind,
};

use crate::context::ToolContext;
use crate::error::{ToolError, ToolResult};
use crate::params::*;

/// A tool's name, human description, and JSON schema for its input
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn tool<P: JsonSchema>(name: &'static str, description: &'static str) -> ToolDefinition {
    ToolDefinition {
        name,
        description,
        input_schema: serde_json::to_value(schemars::schema_for!(P)).unwrap_or_default(),
    }
}

/// All tools exposed by the service
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<QueryParams>("query", "Run a read-only SQL query; always rolled back"),
        tool::<ExecuteParams>(
            "execute",
            "Run a read-write SQL statement inside a committed transaction",
        ),
        tool::<CreateTableParams>(
            "create_table",
            "Create a table and record the change as a reversible migration",
        ),
        tool::<CreateFunctionParams>(
            "create_function",
            "Create a function and record the change as a reversible migration",
        ),
        tool::<CreateTriggerParams>(
            "create_trigger",
            "Create a trigger and record the change as a reversible migration",
        ),
        tool::<CreateIndexParams>(
            "create_index",
            "Create an index and record the change as a reversible migration",
        ),
        tool::<AlterTableParams>(
            "alter_table",
            "Alter a table and record the change as a migration (not reversible)",
        ),
        tool::<ListMigrationsParams>(
            "list_migrations",
            "List all recorded migrations in creation order",
        ),
        tool::<ApplyMigrationsParams>(
            "apply_migrations",
            "Apply recorded migrations in order, optionally starting at an id",
        ),
        tool::<RevertMigrationParams>(
            "revert_migration",
            "Revert a migration (the most recent when no id is given)",
        ),
    ]
}

/// Dispatch a tool invocation by name
pub async fn dispatch(ctx: &ToolContext, name: &str, params: Value) -> ToolResult<Value> {
    tracing::debug!(tool = name, "Dispatching tool invocation");
    match name {
        "query" => run_query(ctx, parse(name, params)?).await,
        "execute" => run_execute(ctx, parse(name, params)?).await,
        "create_table" => create_table(ctx, parse(name, params)?).await,
        "create_function" => create_function(ctx, parse(name, params)?).await,
        "create_trigger" => create_trigger(ctx, parse(name, params)?).await,
        "create_index" => create_index(ctx, parse(name, params)?).await,
        "alter_table" => alter_table(ctx, parse(name, params)?).await,
        "list_migrations" => list_migrations(ctx).await,
        "apply_migrations" => apply_migrations(ctx, parse(name, params)?).await,
        "revert_migration" => revert_migration(ctx, parse(name, params)?).await,
        _ => Err(ToolError::UnknownTool {
            name: name.to_string(),
        }),
    }
}

fn parse<P: DeserializeOwned>(tool: &str, params: Value) -> ToolResult<P> {
    serde_json::from_value(params).map_err(|e| ToolError::invalid_params(tool, e.to_string()))
}

/// Run a SQL statement through the migration pipeline and report both the
/// SQL and the resulting record.
async fn record_and_apply(
    ctx: &ToolContext,
    kind: MigrationKind,
    sql: String,
    description: Option<String>,
) -> ToolResult<Value> {
    let record = ctx.migrator.create_and_apply(kind, &sql, description).await?;
    Ok(json!({ "sql": sql, "migration": record }))
}

pub async fn run_query(ctx: &ToolContext, params: QueryParams) -> ToolResult<Value> {
    let rows = ctx.database.query(&params.sql, &params.params).await?;
    Ok(json!({ "rows": rows, "row_count": rows.len() }))
}

pub async fn run_execute(ctx: &ToolContext, params: ExecuteParams) -> ToolResult<Value> {
    let result = ctx.database.execute(&params.sql, &params.params).await?;
    Ok(json!({
        "sql": params.sql,
        "command": result.command,
        "rows_affected": result.rows_affected,
        "rows": result.rows,
    }))
}

pub async fn create_table(ctx: &ToolContext, params: CreateTableParams) -> ToolResult<Value> {
    let sql = build_create_table(&params.table);
    record_and_apply(ctx, MigrationKind::Table, sql, params.description).await
}

pub async fn create_function(ctx: &ToolContext, params: CreateFunctionParams) -> ToolResult<Value> {
    let sql = build_create_function(&params.function);
    record_and_apply(ctx, MigrationKind::Function, sql, params.description).await
}

pub async fn create_trigger(ctx: &ToolContext, params: CreateTriggerParams) -> ToolResult<Value> {
    let sql = build_create_trigger(&params.trigger);
    record_and_apply(ctx, MigrationKind::Trigger, sql, params.description).await
}

pub async fn create_index(ctx: &ToolContext, params: CreateIndexParams) -> ToolResult<Value> {
    let sql = build_create_index(&params.index);
    record_and_apply(ctx, MigrationKind::Index, sql, params.description).await
}

pub async fn alter_table(ctx: &ToolContext, params: AlterTableParams) -> ToolResult<Value> {
    let sql = build_alter_table(&params.table, &params.operation);
    record_and_apply(ctx, MigrationKind::Alter, sql, params.description).await
}

pub async fn list_migrations(ctx: &ToolContext) -> ToolResult<Value> {
    let migrations = ctx.migrator.list().await?;
    Ok(json!({ "migrations": migrations }))
}

pub async fn apply_migrations(ctx: &ToolContext, params: ApplyMigrationsParams) -> ToolResult<Value> {
    let report = ctx
        .migrator
        .apply_pending(params.from_id.as_deref(), params.force)
        .await?;
    Ok(serde_json::to_value(report)?)
}

pub async fn revert_migration(ctx: &ToolContext, params: RevertMigrationParams) -> ToolResult<Value> {
    let reverted = ctx.migrator.revert(params.migration_id.as_deref()).await?;
    Ok(serde_json::to_value(reverted)?)
}
