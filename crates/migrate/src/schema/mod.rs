//! Schema SQL Builders - structured specs in, one SQL statement out
//!
//! Pure, stateless formatting for the DDL the migration system wraps.
//! The migration core treats the output as opaque SQL text; the revert
//! synthesizer's extraction patterns are written against these shapes.

pub mod alter;
pub mod function;
pub mod index;
pub mod table;
pub mod trigger;

pub use alter::*;
pub use function::*;
pub use index::*;
pub use table::*;
pub use trigger::*;
