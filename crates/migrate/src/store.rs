//! Migration Store - durable ordered record of schema changes
//!
//! Owns the metadata index and the per-migration SQL files. The index is
//! the single source of truth (it embeds the SQL text) and is always
//! rewritten through a staging file promoted with an atomic rename; the
//! `.sql` files are derived forensic artifacts.

use std::path::PathBuf;
use tokio::fs;

use crate::definitions::{MigrationIndex, MigrationRecord, MigrationStatus, StoreConfig};
use crate::error::{MigrationError, MigrationResult};

/// File-backed store for migration records
pub struct MigrationStore {
    config: StoreConfig,
}

impl MigrationStore {
    /// Create a store with default configuration (`migrations/` under the
    /// working directory)
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with custom configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Create a store rooted at the given directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self::with_config(StoreConfig {
            migrations_dir: dir.into(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn index_path(&self) -> PathBuf {
        self.config.migrations_dir.join("index.json")
    }

    fn sql_path(&self, id: &str) -> PathBuf {
        self.config.migrations_dir.join(format!("{}.sql", id))
    }

    /// Idempotent setup: create the migrations directory and an empty index
    /// if absent. Safe to call on every operation.
    pub async fn ensure_initialized(&self) -> MigrationResult<()> {
        fs::create_dir_all(&self.config.migrations_dir)
            .await
            .map_err(|e| {
                MigrationError::store(format!("Failed to create migrations directory: {}", e))
            })?;

        if fs::metadata(self.index_path()).await.is_err() {
            self.write_index(&MigrationIndex::default()).await?;
        }

        Ok(())
    }

    /// Append a record to the store.
    ///
    /// The index entry is authoritative and is written first; the `.sql`
    /// file is regenerable from it, so a failure to write it is logged
    /// rather than propagated.
    pub async fn append(&self, record: &MigrationRecord) -> MigrationResult<()> {
        self.ensure_initialized().await?;

        let mut index = self.read_index().await;
        index.migrations.push(record.clone());
        self.write_index(&index).await?;

        if let Err(e) = fs::write(self.sql_path(&record.id), sql_file_contents(record)).await {
            tracing::warn!(
                id = %record.id,
                "Failed to write migration SQL file (index entry is authoritative): {}",
                e
            );
        }

        tracing::debug!(id = %record.id, name = %record.name, "Migration appended to store");
        Ok(())
    }

    /// All records ordered by id (creation order).
    ///
    /// A missing or unreadable index is an empty store, so a fresh install
    /// bootstraps without errors.
    pub async fn list(&self) -> MigrationResult<Vec<MigrationRecord>> {
        let mut index = self.read_index().await;
        index.migrations.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(index.migrations)
    }

    /// Look up a single record by id
    pub async fn find(&self, id: &str) -> MigrationResult<MigrationRecord> {
        self.list()
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| MigrationError::not_found(id))
    }

    /// Persist the recorded -> applied transition for a record
    pub async fn mark_applied(
        &self,
        id: &str,
        applied_at: chrono::DateTime<chrono::Utc>,
    ) -> MigrationResult<()> {
        let mut index = self.read_index().await;
        let record = index
            .migrations
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| MigrationError::not_found(id))?;
        record.status = MigrationStatus::Applied { applied_at };
        self.write_index(&index).await
    }

    /// Remove a record and its SQL file.
    ///
    /// Fails with `NotFound` when no index entry exists; an already-absent
    /// SQL file is tolerated to survive prior partial cleanup.
    pub async fn remove(&self, id: &str) -> MigrationResult<()> {
        let mut index = self.read_index().await;
        let before = index.migrations.len();
        index.migrations.retain(|record| record.id != id);
        if index.migrations.len() == before {
            return Err(MigrationError::not_found(id));
        }
        self.write_index(&index).await?;

        match fs::remove_file(self.sql_path(id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(id, "Migration SQL file already absent during removal");
            }
            Err(e) => {
                return Err(MigrationError::store(format!(
                    "Failed to delete migration SQL file: {}",
                    e
                )));
            }
        }

        tracing::debug!(id, "Migration removed from store");
        Ok(())
    }

    async fn read_index(&self) -> MigrationIndex {
        match fs::read_to_string(self.index_path()).await {
            Ok(contents) => match serde_json::from_str::<MigrationIndex>(&contents) {
                Ok(index) => index,
                Err(e) => {
                    tracing::warn!("Unreadable migration index, treating store as empty: {}", e);
                    MigrationIndex::default()
                }
            },
            Err(_) => MigrationIndex::default(),
        }
    }

    /// Rewrite the index through a staging file promoted with rename, so a
    /// crash mid-write never leaves a truncated index behind.
    async fn write_index(&self, index: &MigrationIndex) -> MigrationResult<()> {
        let contents = serde_json::to_string_pretty(index)?;
        let staging = self.config.migrations_dir.join("index.json.tmp");
        fs::write(&staging, contents).await.map_err(|e| {
            MigrationError::store(format!("Failed to write migration index: {}", e))
        })?;
        fs::rename(&staging, self.index_path()).await.map_err(|e| {
            MigrationError::store(format!("Failed to promote migration index: {}", e))
        })?;
        Ok(())
    }
}

impl Default for MigrationStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the on-disk `.sql` artifact: a header comment block, a blank
/// line, then the verbatim SQL.
pub fn sql_file_contents(record: &MigrationRecord) -> String {
    format!(
        "-- Migration: {}\n-- Type: {}\n-- Description: {}\n-- Timestamp: {}\n\n{}\n",
        record.name,
        record.kind,
        record
            .description
            .as_deref()
            .unwrap_or("No description provided"),
        record.created_at.to_rfc3339(),
        record.sql
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::MigrationKind;
    use crate::identity;
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_record(id: &str, sql: &str) -> MigrationRecord {
        MigrationRecord {
            id: id.to_string(),
            name: format!("table_{}", id),
            created_at: Utc::now(),
            sql: sql.to_string(),
            kind: MigrationKind::Table,
            description: Some("test migration".to_string()),
            checksum: identity::checksum(sql),
            revert: None,
            status: MigrationStatus::Recorded,
        }
    }

    #[tokio::test]
    async fn test_ensure_initialized_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());

        store.ensure_initialized().await.unwrap();
        let first = std::fs::read_to_string(temp_dir.path().join("index.json")).unwrap();

        store.ensure_initialized().await.unwrap();
        let second = std::fs::read_to_string(temp_dir.path().join("index.json")).unwrap();

        assert_eq!(first, second);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_on_missing_index_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path().join("never_created"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());

        let record = sample_record("1700000000000aabbccdd", "CREATE TABLE tasks (id SERIAL)");
        store.append(&record).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], record);

        // The derived SQL artifact carries the header block and verbatim SQL
        let sql_file =
            std::fs::read_to_string(temp_dir.path().join("1700000000000aabbccdd.sql")).unwrap();
        assert!(sql_file.starts_with("-- Migration: table_1700000000000aabbccdd\n"));
        assert!(sql_file.contains("-- Type: table\n"));
        assert!(sql_file.contains("-- Description: test migration\n"));
        assert!(sql_file.contains("\n\nCREATE TABLE tasks (id SERIAL)\n"));
    }

    #[tokio::test]
    async fn test_list_orders_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());

        store
            .append(&sample_record("1700000000002bb", "CREATE TABLE b (id INT)"))
            .await
            .unwrap();
        store
            .append(&sample_record("1700000000001aa", "CREATE TABLE a (id INT)"))
            .await
            .unwrap();

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["1700000000001aa", "1700000000002bb"]);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());

        let record = sample_record("1700000000000cc", "CREATE TABLE found (id INT)");
        store.append(&record).await.unwrap();

        assert_eq!(store.find(&record.id).await.unwrap(), record);
        let err = store.find("absent").await.unwrap_err();
        assert!(matches!(err, MigrationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_deletes_entry_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());

        let record = sample_record("1700000000000ee", "CREATE TABLE gone (id INT)");
        store.append(&record).await.unwrap();
        assert!(temp_dir.path().join("1700000000000ee.sql").exists());

        store.remove(&record.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(!temp_dir.path().join("1700000000000ee.sql").exists());
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());
        store.ensure_initialized().await.unwrap();

        let err = store.remove("missing").await.unwrap_err();
        assert!(matches!(err, MigrationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_tolerates_absent_sql_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());

        let record = sample_record("1700000000000ff", "CREATE TABLE t (id INT)");
        store.append(&record).await.unwrap();
        std::fs::remove_file(temp_dir.path().join("1700000000000ff.sql")).unwrap();

        store.remove(&record.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_applied_persists_status() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());

        let record = sample_record("1700000000000aa", "CREATE TABLE t (id INT)");
        store.append(&record).await.unwrap();

        let applied_at = Utc::now();
        store.mark_applied(&record.id, applied_at).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(
            listed[0].status,
            MigrationStatus::Applied { applied_at }
        );
    }

    #[tokio::test]
    async fn test_corrupt_index_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = MigrationStore::with_dir(temp_dir.path());
        store.ensure_initialized().await.unwrap();

        std::fs::write(temp_dir.path().join("index.json"), "{not json").unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
