//! Migration Orchestrator - the facade over store, identity, and applier
//!
//! Coordinates the three caller-facing operations: record-and-apply a new
//! migration, apply a range of pending migrations, and revert a prior
//! migration. Mutating operations are serialized through an operation
//! lock: one in-flight migration operation per process, so concurrent
//! callers cannot interleave index writes.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::applier::Applier;
use crate::definitions::{
    ApplyReport, MigrationKind, MigrationRecord, MigrationStatus, Reverted,
};
use crate::error::{MigrationError, MigrationResult};
use crate::identity;
use crate::revert::{synthesize, synthesize_revert};
use crate::store::MigrationStore;

/// Facade coordinating the migration store, identity generation, and
/// transactional application
pub struct Migrator {
    store: MigrationStore,
    applier: Arc<dyn Applier>,
    op_lock: Mutex<()>,
}

impl Migrator {
    pub fn new(store: MigrationStore, applier: Arc<dyn Applier>) -> Self {
        Self {
            store,
            applier,
            op_lock: Mutex::new(()),
        }
    }

    /// Get the underlying store
    pub fn store(&self) -> &MigrationStore {
        &self.store
    }

    /// Record a new migration and immediately apply it.
    ///
    /// The record is durable before the SQL runs; if application fails the
    /// record stays in `Recorded` state (intended but unapplied) and the
    /// error propagates with the migration id attached.
    pub async fn create_and_apply(
        &self,
        kind: MigrationKind,
        sql: &str,
        description: Option<String>,
    ) -> MigrationResult<MigrationRecord> {
        let _guard = self.op_lock.lock().await;
        self.store.ensure_initialized().await?;

        let created_at = Utc::now();
        let mut record = MigrationRecord {
            id: identity::new_migration_id(),
            name: format!("{}_{}", kind, created_at.format("%Y%m%d_%H%M%S")),
            created_at,
            sql: sql.to_string(),
            kind,
            description,
            checksum: identity::checksum(sql),
            // Precomputed inverse; None when no undo is derivable (alter,
            // or SQL the extraction patterns do not recognize).
            revert: synthesize(kind, sql).ok(),
            status: MigrationStatus::Recorded,
        };

        self.store.append(&record).await?;
        tracing::info!(id = %record.id, kind = %kind, "Migration recorded");

        self.applier.apply(&record).await?;

        let applied_at = Utc::now();
        self.store.mark_applied(&record.id, applied_at).await?;
        record.status = MigrationStatus::Applied { applied_at };

        tracing::info!(id = %record.id, "Migration applied");
        Ok(record)
    }

    /// All recorded migrations in creation order; never touches the database
    pub async fn list(&self) -> MigrationResult<Vec<MigrationRecord>> {
        self.store.list().await
    }

    /// Apply recorded migrations in order, starting at `from_id` (inclusive)
    /// when given.
    ///
    /// An unmatched `from_id` fails with `NotFound`. Records already marked
    /// applied are skipped unless `force` re-runs them. The first failure
    /// aborts the remaining batch.
    pub async fn apply_pending(
        &self,
        from_id: Option<&str>,
        force: bool,
    ) -> MigrationResult<ApplyReport> {
        let _guard = self.op_lock.lock().await;
        let start_time = Instant::now();

        let records = self.store.list().await?;
        let start_pos = match from_id {
            Some(id) => records
                .iter()
                .position(|record| record.id == id)
                .ok_or_else(|| MigrationError::not_found(id))?,
            None => 0,
        };

        let mut applied_migrations = Vec::new();
        let mut skipped_count = 0usize;

        for record in &records[start_pos..] {
            if !force && record.status.is_applied() {
                skipped_count += 1;
                continue;
            }

            verify_integrity(record)?;

            tracing::info!(id = %record.id, name = %record.name, "Applying migration");
            self.applier.apply(record).await?;
            self.store.mark_applied(&record.id, Utc::now()).await?;
            applied_migrations.push(record.id.clone());
        }

        Ok(ApplyReport {
            applied_count: applied_migrations.len(),
            applied_migrations,
            skipped_count,
            execution_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Revert a migration: the explicit `migration_id`, or the most recent
    /// record when omitted.
    ///
    /// The revert SQL comes from the inverse recorded at creation time,
    /// falling back to synthesis from the forward SQL. The store entry is
    /// removed only after the revert SQL has committed, so a failed revert
    /// never loses history.
    pub async fn revert(&self, migration_id: Option<&str>) -> MigrationResult<Reverted> {
        let _guard = self.op_lock.lock().await;

        let records = self.store.list().await?;
        let record = match migration_id {
            Some(id) => records
                .iter()
                .find(|record| record.id == id)
                .cloned()
                .ok_or_else(|| MigrationError::not_found(id))?,
            None => records
                .last()
                .cloned()
                .ok_or_else(|| MigrationError::not_found("latest (no migrations recorded)"))?,
        };

        verify_integrity(&record)?;

        let revert_sql = match &record.revert {
            Some(plan) => plan.to_sql(),
            None => synthesize_revert(&record)?,
        };

        tracing::info!(id = %record.id, revert_sql = %revert_sql, "Reverting migration");
        self.applier.execute_revert(&record.id, &revert_sql).await?;
        self.store.remove(&record.id).await?;

        Ok(Reverted { record, revert_sql })
    }
}

/// Checksum verification before any recorded SQL is re-executed
fn verify_integrity(record: &MigrationRecord) -> MigrationResult<()> {
    if identity::checksum(&record.sql) != record.checksum {
        return Err(MigrationError::integrity_mismatch(&record.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use tempfile::TempDir;

    /// Test double tracking applier invocations
    #[derive(Default)]
    struct RecordingApplier {
        calls: StdMutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl RecordingApplier {
        fn failing_on(id: impl Into<String>) -> Self {
            Self {
                calls: StdMutex::new(Vec::new()),
                fail_on: Some(id.into()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Applier for RecordingApplier {
        async fn apply(&self, record: &MigrationRecord) -> MigrationResult<()> {
            if self.fail_on.as_deref() == Some(record.id.as_str()) {
                return Err(MigrationError::execution(
                    &record.id,
                    "relation already exists",
                ));
            }
            self.calls.lock().unwrap().push(record.id.clone());
            Ok(())
        }

        async fn execute_revert(&self, migration_id: &str, sql: &str) -> MigrationResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("revert {}: {}", migration_id, sql));
            Ok(())
        }
    }

    fn migrator_in(dir: &TempDir) -> (Migrator, Arc<RecordingApplier>) {
        let applier = Arc::new(RecordingApplier::default());
        let migrator = Migrator::new(MigrationStore::with_dir(dir.path()), applier.clone());
        (migrator, applier)
    }

    #[tokio::test]
    async fn test_create_and_apply_records_checksum_and_status() {
        let temp_dir = TempDir::new().unwrap();
        let (migrator, applier) = migrator_in(&temp_dir);

        let record = migrator
            .create_and_apply(
                MigrationKind::Table,
                "CREATE TABLE tasks (id SERIAL PRIMARY KEY)",
                Some("task tracking".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(record.checksum, identity::checksum(&record.sql));
        assert!(record.status.is_applied());
        assert_eq!(
            record.revert,
            Some(crate::definitions::RevertPlan::DropTable {
                name: "tasks".to_string()
            })
        );
        assert_eq!(applier.calls(), vec![record.id.clone()]);

        let listed = migrator.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].status.is_applied());
    }

    struct AlwaysFailing;

    #[async_trait]
    impl Applier for AlwaysFailing {
        async fn apply(&self, record: &MigrationRecord) -> MigrationResult<()> {
            Err(MigrationError::execution(&record.id, "syntax error"))
        }
        async fn execute_revert(&self, _: &str, _: &str) -> MigrationResult<()> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_failed_apply_leaves_record_in_recorded_state() {
        let temp_dir = TempDir::new().unwrap();
        let migrator = Migrator::new(
            MigrationStore::with_dir(temp_dir.path()),
            Arc::new(AlwaysFailing),
        );

        let err = migrator
            .create_and_apply(MigrationKind::Table, "CREATE TABLE broken ((", None)
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::Execution { .. }));

        // The record stays recorded-but-unapplied
        let listed = migrator.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].status.is_applied());
    }

    #[tokio::test]
    async fn test_apply_pending_from_id_applies_suffix_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let (migrator, applier) = migrator_in(&temp_dir);

        // Three recorded-but-unapplied migrations, seeded through the store
        let store = MigrationStore::with_dir(temp_dir.path());
        let mut ids = Vec::new();
        for n in 1..=3 {
            let sql = format!("CREATE TABLE t{} (id INT)", n);
            let record = MigrationRecord {
                id: format!("170000000000{}aabbcc", n),
                name: format!("table_{}", n),
                created_at: Utc::now(),
                sql: sql.clone(),
                kind: MigrationKind::Table,
                description: None,
                checksum: identity::checksum(&sql),
                revert: None,
                status: MigrationStatus::Recorded,
            };
            ids.push(record.id.clone());
            store.append(&record).await.unwrap();
        }

        let report = migrator.apply_pending(Some(&ids[1]), false).await.unwrap();

        assert_eq!(report.applied_count, 2);
        assert_eq!(report.applied_migrations, vec![ids[1].clone(), ids[2].clone()]);
        assert_eq!(applier.calls(), vec![ids[1].clone(), ids[2].clone()]);

        // The first record was left untouched
        let listed = migrator.list().await.unwrap();
        assert!(!listed[0].status.is_applied());
        assert!(listed[1].status.is_applied());
        assert!(listed[2].status.is_applied());
    }

    #[tokio::test]
    async fn test_apply_pending_aborts_batch_on_first_failure() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());

        let mut ids = Vec::new();
        for n in 1..=3 {
            let sql = format!("CREATE TABLE t{} (id INT)", n);
            let record = MigrationRecord {
                id: format!("170000000000{}ddeeff", n),
                name: format!("table_{}", n),
                created_at: Utc::now(),
                sql: sql.clone(),
                kind: MigrationKind::Table,
                description: None,
                checksum: identity::checksum(&sql),
                revert: None,
                status: MigrationStatus::Recorded,
            };
            ids.push(record.id.clone());
            store.append(&record).await.unwrap();
        }

        let applier = Arc::new(RecordingApplier::failing_on(ids[1].clone()));
        let migrator = Migrator::new(MigrationStore::with_dir(temp_dir.path()), applier.clone());

        let err = migrator.apply_pending(None, false).await.unwrap_err();
        assert!(matches!(err, MigrationError::Execution { ref id, .. } if *id == ids[1]));

        // The first record committed, the failing one and everything after
        // it did not
        assert_eq!(applier.calls(), vec![ids[0].clone()]);
        let listed = migrator.list().await.unwrap();
        assert!(listed[0].status.is_applied());
        assert!(!listed[1].status.is_applied());
        assert!(!listed[2].status.is_applied());
    }

    #[tokio::test]
    async fn test_apply_pending_unmatched_from_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let (migrator, applier) = migrator_in(&temp_dir);

        migrator
            .create_and_apply(MigrationKind::Table, "CREATE TABLE t (id INT)", None)
            .await
            .unwrap();

        let err = migrator
            .apply_pending(Some("9999999999999ffffffff"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::NotFound { .. }));
        // Nothing beyond the original create was applied
        assert_eq!(applier.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_pending_skips_applied_unless_forced() {
        let temp_dir = TempDir::new().unwrap();
        let (migrator, applier) = migrator_in(&temp_dir);

        let record = migrator
            .create_and_apply(MigrationKind::Table, "CREATE TABLE t (id INT)", None)
            .await
            .unwrap();

        let report = migrator.apply_pending(None, false).await.unwrap();
        assert_eq!(report.applied_count, 0);
        assert_eq!(report.skipped_count, 1);
        assert_eq!(applier.calls().len(), 1);

        let forced = migrator.apply_pending(None, true).await.unwrap();
        assert_eq!(forced.applied_count, 1);
        assert_eq!(forced.applied_migrations, vec![record.id]);
        assert_eq!(applier.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_revert_on_empty_store_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let (migrator, _applier) = migrator_in(&temp_dir);

        let err = migrator.revert(None).await.unwrap_err();
        assert!(matches!(err, MigrationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_revert_removes_exactly_the_reverted_record() {
        let temp_dir = TempDir::new().unwrap();
        let (migrator, applier) = migrator_in(&temp_dir);

        let record = migrator
            .create_and_apply(
                MigrationKind::Table,
                "CREATE TABLE tasks (id SERIAL PRIMARY KEY)",
                None,
            )
            .await
            .unwrap();

        let reverted = migrator.revert(None).await.unwrap();
        assert_eq!(reverted.record.id, record.id);
        assert_eq!(reverted.revert_sql, "DROP TABLE IF EXISTS tasks");

        assert!(migrator.list().await.unwrap().is_empty());
        assert!(!temp_dir.path().join(format!("{}.sql", record.id)).exists());
        assert!(applier
            .calls()
            .iter()
            .any(|call| call.contains("DROP TABLE IF EXISTS tasks")));
    }

    #[tokio::test]
    async fn test_revert_alter_is_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let (migrator, _applier) = migrator_in(&temp_dir);

        let record = migrator
            .create_and_apply(
                MigrationKind::Alter,
                "ALTER TABLE tasks ADD COLUMN done BOOLEAN",
                None,
            )
            .await
            .unwrap();
        assert!(record.revert.is_none());

        let err = migrator.revert(Some(&record.id)).await.unwrap_err();
        assert!(matches!(err, MigrationError::UnsupportedKind { .. }));
        // History survives the failed revert
        assert_eq!(migrator.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_revert_detects_tampered_sql() {
        let temp_dir = TempDir::new().unwrap();
        let (migrator, _applier) = migrator_in(&temp_dir);

        migrator
            .create_and_apply(MigrationKind::Table, "CREATE TABLE t (id INT)", None)
            .await
            .unwrap();

        // Tamper with the recorded SQL behind the store's back
        let index_path = temp_dir.path().join("index.json");
        let tampered = std::fs::read_to_string(&index_path)
            .unwrap()
            .replace("CREATE TABLE t (id INT)", "CREATE TABLE evil (id INT)");
        std::fs::write(&index_path, tampered).unwrap();

        let err = migrator.revert(None).await.unwrap_err();
        assert!(matches!(err, MigrationError::IntegrityMismatch { .. }));
    }
}
