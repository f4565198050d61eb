use std::path::Path;

use serde_json::{json, Value};

use pgforge_tools::{dispatch, ToolContext, ToolError};

use super::print_json;

/// Run a schema tool against a JSON spec file, going through the same
/// dispatch path a remote caller would.
pub async fn run(
    ctx: &ToolContext,
    tool: &str,
    spec_path: &Path,
    description: Option<String>,
) -> Result<(), ToolError> {
    let contents = std::fs::read_to_string(spec_path)?;
    let mut params: Value = serde_json::from_str(&contents)?;

    if let (Some(description), Some(object)) = (description, params.as_object_mut()) {
        object.insert("description".to_string(), json!(description));
    }

    let result = dispatch(ctx, tool, params).await?;
    print_json(&result);
    Ok(())
}
