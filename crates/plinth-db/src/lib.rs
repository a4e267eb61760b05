//! plinth-db - Database abstraction layer for Plinth
//!
//! This crate provides the `Database` trait (SQL execution) and the
//! `OptionStore` trait (persistent key/value options), a DuckDB backend
//! implementing both, and an in-memory option store.

pub mod duckdb;
pub mod error;
pub mod memory;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use memory::MemoryOptionStore;
pub use traits::{Database, OptionStore};
