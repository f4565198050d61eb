pub mod inspect;
pub mod migrate;
pub mod query;
pub mod schema;
pub mod tools;

use serde_json::Value;

/// Parse `--param` values: JSON when it parses, raw string otherwise
pub fn parse_params(raw: &[String]) -> Vec<Value> {
    raw.iter()
        .map(|s| serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone())))
        .collect()
}

/// Pretty-print a JSON result to stdout
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{}", rendered),
        Err(_) => println!("{}", value),
    }
}
