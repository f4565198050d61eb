//! # pgforge-db: Database Layer for pgforge
//!
//! Provides the PostgreSQL access layer for the pgforge tool service:
//! connection pool configuration and construction, and a thin transactional
//! executor with a read-only query path and a committed write path.

pub mod config;
pub mod database;
pub mod error;

pub use config::*;
pub use database::*;
pub use error::*;
