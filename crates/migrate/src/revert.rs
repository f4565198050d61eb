//! Revert Synthesizer - derives undo statements from recorded SQL
//!
//! Extraction is heuristic by design: it pattern-matches the text the
//! schema builders emit, not a structured AST. Patterns are
//! case-insensitive and tolerate the multi-line SQL the function, trigger,
//! and index builders produce.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::definitions::{MigrationKind, MigrationRecord, RevertPlan};
use crate::error::{MigrationError, MigrationResult};

static CREATE_TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\bCREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?([A-Za-z_"][\w".]*)"#).unwrap()
});

static CREATE_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\bCREATE\s+(?:OR\s+REPLACE\s+)?FUNCTION\s+([A-Za-z_"][\w".]*)\s*\("#)
        .unwrap()
});

static CREATE_TRIGGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\bCREATE\s+TRIGGER\s+([A-Za-z_"][\w"]*).*?\bON\s+([A-Za-z_"][\w".]*)"#)
        .unwrap()
});

static CREATE_INDEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)\bCREATE\s+(?:UNIQUE\s+)?INDEX\s+(?:CONCURRENTLY\s+)?(?:IF\s+NOT\s+EXISTS\s+)?([A-Za-z_"][\w"]*)"#,
    )
    .unwrap()
});

/// Derive the structured inverse for forward SQL of the given kind.
///
/// Fails with `UnsupportedKind` for `alter` (no general inverse is
/// derivable) and with `RevertSynthesis` when the SQL does not match the
/// expected shape for its kind.
pub fn synthesize(kind: MigrationKind, sql: &str) -> MigrationResult<RevertPlan> {
    match kind {
        MigrationKind::Table => CREATE_TABLE
            .captures(sql)
            .map(|captures| RevertPlan::DropTable {
                name: captures[1].to_string(),
            })
            .ok_or_else(|| {
                MigrationError::revert_synthesis("no table name found after CREATE TABLE")
            }),
        MigrationKind::Function => CREATE_FUNCTION
            .captures(sql)
            .map(|captures| RevertPlan::DropFunction {
                name: captures[1].to_string(),
            })
            .ok_or_else(|| {
                MigrationError::revert_synthesis("no function name found after CREATE FUNCTION")
            }),
        MigrationKind::Trigger => CREATE_TRIGGER
            .captures(sql)
            .map(|captures| RevertPlan::DropTrigger {
                name: captures[1].to_string(),
                table: captures[2].to_string(),
            })
            .ok_or_else(|| {
                MigrationError::revert_synthesis(
                    "no trigger name and table found after CREATE TRIGGER",
                )
            }),
        MigrationKind::Index => CREATE_INDEX
            .captures(sql)
            .map(|captures| RevertPlan::DropIndex {
                name: captures[1].to_string(),
            })
            .ok_or_else(|| {
                MigrationError::revert_synthesis("no index name found after CREATE INDEX")
            }),
        MigrationKind::Alter => Err(MigrationError::unsupported_kind(MigrationKind::Alter)),
    }
}

/// The revert statement for a record, rendered as SQL text
pub fn synthesize_revert(record: &MigrationRecord) -> MigrationResult<String> {
    synthesize(record.kind, &record.sql).map(|plan| plan.to_sql())
}
