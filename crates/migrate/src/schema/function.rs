//! CREATE FUNCTION builder

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Function definition for CREATE [OR REPLACE] FUNCTION
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FunctionSpec {
    /// Function name, optionally schema-qualified
    pub name: String,
    /// Argument declarations, e.g. "user_id INTEGER"
    #[serde(default)]
    pub args: Vec<String>,
    /// Return type, e.g. "trigger", "INTEGER", "SETOF users"
    pub returns: String,
    /// Implementation language (defaults to plpgsql)
    #[serde(default = "default_language")]
    pub language: String,
    /// Function body, emitted inside a dollar-quoted block
    pub body: String,
    /// Emit OR REPLACE (defaults to true)
    #[serde(default = "default_or_replace")]
    pub or_replace: bool,
}

fn default_language() -> String {
    "plpgsql".to_string()
}

fn default_or_replace() -> bool {
    true
}

/// Build the CREATE FUNCTION statement
pub fn build_create_function(spec: &FunctionSpec) -> String {
    format!(
        "CREATE {}FUNCTION {}({})\nRETURNS {}\nLANGUAGE {}\nAS $$\n{}\n$$",
        if spec.or_replace { "OR REPLACE " } else { "" },
        spec.name,
        spec.args.join(", "),
        spec.returns,
        spec.language,
        spec.body
    )
}
