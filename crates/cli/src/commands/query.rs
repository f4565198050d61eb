use pgforge_tools::{run_execute, run_query, ExecuteParams, QueryParams, ToolContext, ToolError};

use super::{parse_params, print_json};

pub async fn query(ctx: &ToolContext, sql: &str, raw_params: &[String]) -> Result<(), ToolError> {
    let result = run_query(
        ctx,
        QueryParams {
            sql: sql.to_string(),
            params: parse_params(raw_params),
        },
    )
    .await?;
    print_json(&result);
    Ok(())
}

pub async fn execute(ctx: &ToolContext, sql: &str, raw_params: &[String]) -> Result<(), ToolError> {
    let result = run_execute(
        ctx,
        ExecuteParams {
            sql: sql.to_string(),
            params: parse_params(raw_params),
        },
    )
    .await?;
    print_json(&result);
    Ok(())
}
