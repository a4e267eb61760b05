//! Database and option store trait definitions

use crate::error::DbResult;
use async_trait::async_trait;
use serde_json::Value;

/// SQL execution handle
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single SQL statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Persistent key/value option storage
///
/// Values are arbitrary JSON. A missing option and a deleted option are the
/// same thing: [`get_option`](OptionStore::get_option) returns `None`.
#[async_trait]
pub trait OptionStore: Send + Sync {
    /// Read an option
    async fn get_option(&self, name: &str) -> DbResult<Option<Value>>;

    /// Create or overwrite an option
    async fn update_option(&self, name: &str, value: &Value) -> DbResult<()>;

    /// Remove an option, returns whether it existed
    async fn delete_option(&self, name: &str) -> DbResult<bool>;

    /// Atomically set `name` to `new` if its current value equals `expected`.
    ///
    /// `expected = None` means "only if absent". Returns `false` without
    /// writing when the current value differs.
    async fn compare_and_set(
        &self,
        name: &str,
        expected: Option<&Value>,
        new: &Value,
    ) -> DbResult<bool>;
}
