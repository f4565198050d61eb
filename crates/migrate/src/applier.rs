//! Migration Applier - transactional execution of recorded SQL
//!
//! One transaction lifecycle per call: begin, execute the recorded SQL
//! verbatim, commit. Any failure propagates with the database error text
//! preserved and the transaction rolled back.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::definitions::MigrationRecord;
use crate::error::{MigrationError, MigrationResult};

/// Executes migration SQL against the database.
///
/// A trait seam so the orchestrator can be exercised with a recording
/// double in tests.
#[async_trait]
pub trait Applier: Send + Sync {
    /// Apply a migration's recorded SQL
    async fn apply(&self, record: &MigrationRecord) -> MigrationResult<()>;

    /// Execute a revert statement with the same transactional guarantees
    async fn execute_revert(&self, migration_id: &str, sql: &str) -> MigrationResult<()>;
}

/// Applier backed by a PostgreSQL connection pool
pub struct SqlApplier {
    pool: Pool<Postgres>,
}

impl SqlApplier {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn run(&self, id: &str, sql: &str) -> MigrationResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            MigrationError::execution(id, format!("Failed to start transaction: {}", e))
        })?;

        // Early returns drop the transaction, which rolls it back.
        sqlx::query(sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| MigrationError::execution(id, e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| MigrationError::execution(id, format!("Failed to commit: {}", e)))?;

        tracing::debug!(id, "Migration SQL committed");
        Ok(())
    }
}

#[async_trait]
impl Applier for SqlApplier {
    async fn apply(&self, record: &MigrationRecord) -> MigrationResult<()> {
        self.run(&record.id, &record.sql).await
    }

    async fn execute_revert(&self, migration_id: &str, sql: &str) -> MigrationResult<()> {
        self.run(migration_id, sql).await
    }
}
