use serde_json::json;

use pgforge_tools::{resources, ToolContext, ToolError};

use super::print_json;

pub async fn schemas(ctx: &ToolContext) -> Result<(), ToolError> {
    let rows = resources::list_schemas(&ctx.database).await?;
    print_json(&json!({ "schemas": rows }));
    Ok(())
}

pub async fn tables(ctx: &ToolContext, schema: &str) -> Result<(), ToolError> {
    let rows = resources::list_tables(&ctx.database, schema).await?;
    print_json(&json!({ "schema": schema, "tables": rows }));
    Ok(())
}

pub async fn table(ctx: &ToolContext, schema: &str, table: &str) -> Result<(), ToolError> {
    let rows = resources::describe_table(&ctx.database, schema, table).await?;
    print_json(&json!({ "schema": schema, "table": table, "columns": rows }));
    Ok(())
}
