//! CREATE INDEX builder

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Index definition for CREATE [UNIQUE] INDEX
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IndexSpec {
    /// Index name; derived from table and columns when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Table to index
    pub table: String,
    /// Column names or expressions
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    /// Index method, e.g. "gin", "btree"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Partial index predicate, emitted verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
}

impl IndexSpec {
    /// The effective index name, deriving `idx_<table>_<columns>` when unset
    pub fn index_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("idx_{}_{}", self.table, self.columns.join("_")))
    }
}

/// Build the CREATE INDEX statement
pub fn build_create_index(spec: &IndexSpec) -> String {
    let using = spec
        .method
        .as_deref()
        .map(|method| format!(" USING {}", method))
        .unwrap_or_default();
    let predicate = spec
        .predicate
        .as_deref()
        .map(|predicate| format!("\nWHERE {}", predicate))
        .unwrap_or_default();

    format!(
        "CREATE {}INDEX {}\nON {}{} ({}){}",
        if spec.unique { "UNIQUE " } else { "" },
        spec.index_name(),
        spec.table,
        using,
        spec.columns.join(", "),
        predicate
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_create_index() {
        let spec = IndexSpec {
            name: None,
            table: "tasks".to_string(),
            columns: vec!["status".to_string()],
            unique: false,
            method: None,
            predicate: None,
        };

        assert_eq!(
            build_create_index(&spec),
            "CREATE INDEX idx_tasks_status\nON tasks (status)"
        );
    }

    #[test]
    fn test_build_create_index_unique_with_method_and_predicate() {
        let spec = IndexSpec {
            name: Some("idx_active_slugs".to_string()),
            table: "tasks".to_string(),
            columns: vec!["slug".to_string()],
            unique: true,
            method: Some("btree".to_string()),
            predicate: Some("archived = false".to_string()),
        };

        let sql = build_create_index(&spec);
        assert!(sql.starts_with("CREATE UNIQUE INDEX idx_active_slugs\n"));
        assert!(sql.contains("ON tasks USING btree (slug)"));
        assert!(sql.ends_with("WHERE archived = false"));
    }
}
