//! ALTER TABLE builder

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::table::ColumnSpec;

/// A single ALTER TABLE operation
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum AlterOperation {
    AddColumn {
        column: ColumnSpec,
    },
    DropColumn {
        column: String,
    },
    AlterColumnType {
        column: String,
        #[serde(rename = "type")]
        sql_type: String,
    },
    SetDefault {
        column: String,
        default: String,
    },
    DropDefault {
        column: String,
    },
    SetNotNull {
        column: String,
    },
    DropNotNull {
        column: String,
    },
    RenameColumn {
        from: String,
        to: String,
    },
    RenameTable {
        to: String,
    },
    AddConstraint {
        name: String,
        definition: String,
    },
    DropConstraint {
        name: String,
    },
}

/// Build the ALTER TABLE statement
pub fn build_alter_table(table: &str, operation: &AlterOperation) -> String {
    let clause = match operation {
        AlterOperation::AddColumn { column } => {
            let mut sql = format!("ADD COLUMN {} {}", column.name, column.sql_type);
            if !column.nullable {
                sql.push_str(" NOT NULL");
            }
            if let Some(default) = &column.default {
                sql.push_str(" DEFAULT ");
                sql.push_str(default);
            }
            sql
        }
        AlterOperation::DropColumn { column } => format!("DROP COLUMN {}", column),
        AlterOperation::AlterColumnType { column, sql_type } => {
            format!("ALTER COLUMN {} TYPE {}", column, sql_type)
        }
        AlterOperation::SetDefault { column, default } => {
            format!("ALTER COLUMN {} SET DEFAULT {}", column, default)
        }
        AlterOperation::DropDefault { column } => {
            format!("ALTER COLUMN {} DROP DEFAULT", column)
        }
        AlterOperation::SetNotNull { column } => {
            format!("ALTER COLUMN {} SET NOT NULL", column)
        }
        AlterOperation::DropNotNull { column } => {
            format!("ALTER COLUMN {} DROP NOT NULL", column)
        }
        AlterOperation::RenameColumn { from, to } => {
            format!("RENAME COLUMN {} TO {}", from, to)
        }
        AlterOperation::RenameTable { to } => format!("RENAME TO {}", to),
        AlterOperation::AddConstraint { name, definition } => {
            format!("ADD CONSTRAINT {} {}", name, definition)
        }
        AlterOperation::DropConstraint { name } => format!("DROP CONSTRAINT {}", name),
    };

    format!("ALTER TABLE {} {}", table, clause)
}
