//! Error types for plinth-db

use thiserror::Error;

/// Database and option store errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Option store read/write error (D003)
    #[error("[D003] Option '{name}' could not be accessed: {message}")]
    OptionError { name: String, message: String },

    /// Stored option value is not valid JSON (D004)
    #[error("[D004] Option '{name}' holds malformed JSON: {source}")]
    OptionDecode {
        name: String,
        source: serde_json::Error,
    },

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
