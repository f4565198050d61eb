//! Database Integration - Connection pooling and transactional execution
//!
//! Wraps a PostgreSQL connection pool and exposes the two execution paths
//! the tool surface consumes: `query` (read-only transaction, always rolled
//! back) and `execute` (read-write transaction, committed on success).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Pool, Postgres, Row, TypeInfo};

use crate::config::DatabaseConfig;
use crate::error::{DbError, DbResult};

/// Result of a read-write statement execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResult {
    /// Command tag derived from the statement (e.g. "INSERT", "CREATE")
    pub command: String,
    /// Number of rows affected, or returned for row-producing statements
    pub rows_affected: u64,
    /// Rows returned by the statement (RETURNING clauses, SELECT), as JSON objects
    pub rows: Vec<Value>,
}

/// Managed PostgreSQL pool with transactional query/execute paths
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool<Postgres>,
    config: DatabaseConfig,
}

impl Database {
    /// Connect to PostgreSQL using the given configuration
    pub async fn connect(config: DatabaseConfig) -> DbResult<Self> {
        let mut options = PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .min_connections(config.pool.min_connections)
            .acquire_timeout(config.pool.acquire_timeout_duration());

        if let Some(idle) = config.pool.idle_timeout_duration() {
            options = options.idle_timeout(idle);
        }
        if let Some(lifetime) = config.pool.max_lifetime_duration() {
            options = options.max_lifetime(lifetime);
        }

        let pool = options.connect(&config.url).await?;
        tracing::info!(
            max_connections = config.pool.max_connections,
            "Database pool established"
        );

        Ok(Self { pool, config })
    }

    /// Wrap an existing pool (used by tests and embedding callers)
    pub fn from_pool(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            config: DatabaseConfig::new(String::new()),
        }
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    /// Acquire a connection from the pool; the caller owns it until drop
    pub async fn acquire(&self) -> DbResult<sqlx::pool::PoolConnection<Postgres>> {
        if self.pool.is_closed() {
            return Err(DbError::PoolClosed);
        }

        match self.pool.acquire().await {
            Ok(conn) => {
                tracing::debug!(
                    total = self.pool.size(),
                    idle = self.pool.num_idle(),
                    "Database connection acquired"
                );
                Ok(conn)
            }
            Err(e) => {
                let error = self.classify_error(e);
                tracing::error!("Failed to acquire database connection: {}", error);
                Err(error)
            }
        }
    }

    /// Begin a database transaction
    pub async fn begin(&self) -> DbResult<sqlx::Transaction<'_, Postgres>> {
        if self.pool.is_closed() {
            return Err(DbError::PoolClosed);
        }

        self.pool.begin().await.map_err(|e| {
            let error = self.classify_error(e);
            tracing::error!("Failed to begin database transaction: {}", error);
            error
        })
    }

    /// Run a read-only query inside a transaction that is always rolled back.
    ///
    /// Rows are decoded to JSON objects keyed by column name.
    pub async fn query(&self, sql: &str, params: &[Value]) -> DbResult<Vec<Value>> {
        let mut tx = self.begin().await?;

        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::transaction(e.to_string()))?;

        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_value(query, param);
        }

        let rows = query
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| DbError::query(e.to_string()))?;

        // Read path leaves no trace, even for queries with side effects.
        tx.rollback()
            .await
            .map_err(|e| DbError::transaction(e.to_string()))?;

        Ok(rows.iter().map(row_to_json).collect())
    }

    /// Execute a read-write statement inside a transaction, committing on
    /// success and rolling back on failure.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<ExecuteResult> {
        let command = command_tag(sql);
        let mut tx = self.begin().await?;

        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_value(query, param);
        }

        let (rows_affected, rows) = if produces_rows(sql) {
            let rows = query
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| DbError::execution(e.to_string()))?;
            let decoded: Vec<Value> = rows.iter().map(row_to_json).collect();
            (decoded.len() as u64, decoded)
        } else {
            let result = query
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::execution(e.to_string()))?;
            (result.rows_affected(), Vec::new())
        };

        tx.commit()
            .await
            .map_err(|e| DbError::transaction(e.to_string()))?;

        tracing::debug!(command = %command, rows_affected, "Statement executed");

        Ok(ExecuteResult {
            command,
            rows_affected,
            rows,
        })
    }

    /// Pool sizing configured for this database
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    fn classify_error(&self, error: sqlx::Error) -> DbError {
        match &error {
            sqlx::Error::PoolTimedOut => DbError::ConnectionTimeout {
                timeout: self.config.pool.acquire_timeout,
            },
            sqlx::Error::PoolClosed => DbError::PoolClosed,
            _ => DbError::AcquisitionFailed(error),
        }
    }
}

/// Bind a JSON parameter value to the query by its underlying type
fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => query.bind(s.clone()),
        // Arrays and objects go through as jsonb
        other => query.bind(other.clone()),
    }
}

/// Decode a row to a JSON object keyed by column name
fn row_to_json(row: &PgRow) -> Value {
    let mut object = serde_json::Map::with_capacity(row.columns().len());
    for (index, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), decode_column(row, index, column));
    }
    Value::Object(object)
}

fn decode_column(row: &PgRow, index: usize, column: &sqlx::postgres::PgColumn) -> Value {
    let type_name = column.type_info().name();
    match type_name {
        "BOOL" => json_opt(row.try_get::<Option<bool>, _>(index)),
        "INT2" => json_opt(row.try_get::<Option<i16>, _>(index)),
        "INT4" => json_opt(row.try_get::<Option<i32>, _>(index)),
        "INT8" => json_opt(row.try_get::<Option<i64>, _>(index)),
        "FLOAT4" => json_opt(row.try_get::<Option<f32>, _>(index)),
        "FLOAT8" => json_opt(row.try_get::<Option<f64>, _>(index)),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => {
            json_opt(row.try_get::<Option<String>, _>(index))
        }
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(index)
            .ok()
            .flatten()
            .unwrap_or(Value::Null),
        "TIMESTAMPTZ" => json_opt(
            row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
                .map(|v| v.map(|ts| ts.to_rfc3339())),
        ),
        "TIMESTAMP" => json_opt(
            row.try_get::<Option<chrono::NaiveDateTime>, _>(index)
                .map(|v| v.map(|ts| ts.to_string())),
        ),
        "DATE" => json_opt(
            row.try_get::<Option<chrono::NaiveDate>, _>(index)
                .map(|v| v.map(|d| d.to_string())),
        ),
        _ => match row.try_get::<Option<String>, _>(index) {
            Ok(value) => value.map(Value::String).unwrap_or(Value::Null),
            Err(_) => {
                tracing::warn!(column = column.name(), pg_type = type_name, "Undecodable column type, returning null");
                Value::Null
            }
        },
    }
}

fn json_opt<T: Into<Value>>(value: Result<Option<T>, sqlx::Error>) -> Value {
    match value {
        Ok(Some(v)) => v.into(),
        _ => Value::Null,
    }
}

/// Command tag for an executed statement: its first keyword, uppercased
fn command_tag(sql: &str) -> String {
    sql.split_whitespace()
        .next()
        .unwrap_or("")
        .to_uppercase()
}

/// Whether the statement produces a row set (SELECT/SHOW/WITH or RETURNING)
fn produces_rows(sql: &str) -> bool {
    let upper = sql.to_uppercase();
    let first = upper.split_whitespace().next().unwrap_or("");
    matches!(first, "SELECT" | "SHOW" | "WITH")
        || upper.split_whitespace().any(|word| word == "RETURNING")
}
