//! CREATE TRIGGER builder

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// When the trigger fires relative to the triggering statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

impl TriggerTiming {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::InsteadOf => "INSTEAD OF",
        }
    }
}

/// Statement events the trigger reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
    Truncate,
}

impl TriggerEvent {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
        }
    }
}

/// Trigger definition for CREATE TRIGGER
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TriggerSpec {
    /// Trigger name
    pub name: String,
    /// Table the trigger is attached to
    pub table: String,
    pub timing: TriggerTiming,
    pub events: Vec<TriggerEvent>,
    /// FOR EACH ROW instead of FOR EACH STATEMENT (defaults to true)
    #[serde(default = "default_for_each_row")]
    pub for_each_row: bool,
    /// Optional WHEN condition, emitted verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    /// Trigger function to execute (without parentheses)
    pub function: String,
}

fn default_for_each_row() -> bool {
    true
}

/// Build the CREATE TRIGGER statement
pub fn build_create_trigger(spec: &TriggerSpec) -> String {
    let events: Vec<&str> = spec.events.iter().map(TriggerEvent::as_sql).collect();
    let when = spec
        .when
        .as_deref()
        .map(|condition| format!("\nWHEN ({})", condition))
        .unwrap_or_default();

    format!(
        "CREATE TRIGGER {}\n{} {} ON {}\nFOR EACH {}{}\nEXECUTE FUNCTION {}()",
        spec.name,
        spec.timing.as_sql(),
        events.join(" OR "),
        spec.table,
        if spec.for_each_row { "ROW" } else { "STATEMENT" },
        when,
        spec.function
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_create_trigger() {
        let spec = TriggerSpec {
            name: "update_tasks_modified".to_string(),
            table: "tasks".to_string(),
            timing: TriggerTiming::Before,
            events: vec![TriggerEvent::Update],
            for_each_row: true,
            when: None,
            function: "set_modified".to_string(),
        };

        let sql = build_create_trigger(&spec);
        assert_eq!(
            sql,
            "CREATE TRIGGER update_tasks_modified\nBEFORE UPDATE ON tasks\nFOR EACH ROW\nEXECUTE FUNCTION set_modified()"
        );
    }

    #[test]
    fn test_build_create_trigger_multiple_events_and_when() {
        let spec = TriggerSpec {
            name: "audit_changes".to_string(),
            table: "accounts".to_string(),
            timing: TriggerTiming::After,
            events: vec![TriggerEvent::Insert, TriggerEvent::Update, TriggerEvent::Delete],
            for_each_row: false,
            when: Some("pg_trigger_depth() = 0".to_string()),
            function: "record_audit".to_string(),
        };

        let sql = build_create_trigger(&spec);
        assert!(sql.contains("AFTER INSERT OR UPDATE OR DELETE ON accounts"));
        assert!(sql.contains("FOR EACH STATEMENT"));
        assert!(sql.contains("WHEN (pg_trigger_depth() = 0)"));
    }
}
