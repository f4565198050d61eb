//! Tool context - the composition object every tool operates on
//!
//! Owned by the process's composition root and passed explicitly; there
//! is no ambient singleton for the pool or the store.

use std::path::PathBuf;
use std::sync::Arc;

use pgforge_db::Database;
use pgforge_migrate::{MigrationStore, Migrator, SqlApplier};

/// Everything a tool invocation needs: the database executor and the
/// migration orchestrator.
pub struct ToolContext {
    pub database: Database,
    pub migrator: Migrator,
}

impl ToolContext {
    pub fn new(database: Database, migrator: Migrator) -> Self {
        Self { database, migrator }
    }

    /// Wire a complete context from a connected database and a migrations
    /// directory: store, SQL applier over the shared pool, orchestrator.
    pub fn bootstrap(database: Database, migrations_dir: impl Into<PathBuf>) -> Self {
        let applier = Arc::new(SqlApplier::new(database.pool().clone()));
        let migrator = Migrator::new(MigrationStore::with_dir(migrations_dir), applier);
        Self { database, migrator }
    }
}
