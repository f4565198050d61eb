//! # pgforge-migrate: Migration Management for pgforge
//!
//! Turns an ad-hoc SQL statement into a durable, ordered, checksummed
//! migration record; applies migrations transactionally against a live
//! database; and reconstructs a safe undo statement for a prior migration
//! from its recorded SQL.
//!
//! The store keeps a metadata index (`index.json`, the source of truth)
//! and one forensic `.sql` file per migration. The orchestrator is the
//! facade callers use: record-and-apply, apply pending, revert.

pub mod applier;
pub mod definitions;
pub mod error;
pub mod identity;
pub mod orchestrator;
pub mod revert;
pub mod schema;
pub mod store;

pub use applier::*;
pub use definitions::*;
pub use error::*;
pub use identity::*;
pub use orchestrator::*;
pub use revert::*;
pub use schema::*;
pub use store::*;
