use serde_json::json;

use pgforge_tools::{definitions, ToolError};

use super::print_json;

pub fn print_definitions() -> Result<(), ToolError> {
    let tools: Vec<_> = definitions()
        .into_iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "input_schema": tool.input_schema,
            })
        })
        .collect();

    print_json(&json!({ "tools": tools }));
    Ok(())
}
