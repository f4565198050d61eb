//! Database configuration
//!
//! Environment-driven configuration for the PostgreSQL connection pool.

use std::time::Duration;

use crate::error::{DbError, DbResult};

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    pub idle_timeout: Option<u64>,
    pub max_lifetime: Option<u64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: 30,
            idle_timeout: Some(600),
            max_lifetime: Some(1800),
        }
    }
}

impl PoolConfig {
    pub fn acquire_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout)
    }

    pub fn idle_timeout_duration(&self) -> Option<Duration> {
        self.idle_timeout.map(Duration::from_secs)
    }

    pub fn max_lifetime_duration(&self) -> Option<Duration> {
        self.max_lifetime.map(Duration::from_secs)
    }
}

/// Database configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Pool sizing and timeout settings
    pub pool: PoolConfig,
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// `DATABASE_URL` is required; pool settings fall back to defaults when
    /// `PGFORGE_MAX_CONNECTIONS` / `PGFORGE_MIN_CONNECTIONS` /
    /// `PGFORGE_ACQUIRE_TIMEOUT` are unset.
    pub fn from_env() -> DbResult<Self> {
        let url = std::env::var("DATABASE_URL").map_err(|_| {
            DbError::configuration("DATABASE_URL environment variable is not set")
        })?;

        let mut pool = PoolConfig::default();
        if let Some(max) = read_env_u32("PGFORGE_MAX_CONNECTIONS")? {
            pool.max_connections = max;
        }
        if let Some(min) = read_env_u32("PGFORGE_MIN_CONNECTIONS")? {
            pool.min_connections = min;
        }
        if let Some(timeout) = read_env_u32("PGFORGE_ACQUIRE_TIMEOUT")? {
            pool.acquire_timeout = timeout as u64;
        }

        Ok(Self { url, pool })
    }

    /// Build a configuration from an explicit URL with default pool settings
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: PoolConfig::default(),
        }
    }
}

fn read_env_u32(name: &str) -> DbResult<Option<u32>> {
    match std::env::var(name) {
        Ok(value) => value.parse::<u32>().map(Some).map_err(|_| {
            DbError::configuration(format!("{} must be a positive integer, got '{}'", name, value))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, 30);
        assert_eq!(config.idle_timeout, Some(600));
    }

    #[test]
    fn test_database_config_new() {
        let config = DatabaseConfig::new("postgres://localhost/app");
        assert_eq!(config.url, "postgres://localhost/app");
        assert_eq!(config.pool.max_connections, 10);
    }
}
