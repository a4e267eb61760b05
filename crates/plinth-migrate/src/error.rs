//! Error types for plinth-migrate

use plinth_core::CoreError;
use plinth_db::DbError;
use thiserror::Error;

/// Migration runner errors.
///
/// Statement failures are *not* errors: they are logged and reported in
/// [`MigrationReport`](crate::MigrationReport). These variants cover the
/// infrastructure the runner depends on.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Option store read or write failed (M001)
    #[error("[M001] Option store failure: {0}")]
    Store(#[from] DbError),

    /// Migrations directory could not be listed (M002)
    #[error("[M002] Failed to list migrations in {path}: {message}")]
    Discovery { path: String, message: String },

    /// Stored completed-migrations value has an unexpected shape (M003)
    #[error("[M003] Malformed completed migrations option: {0}")]
    MalformedCompletedSet(String),

    /// Schema manager DDL failed (M004)
    #[error("[M004] Schema change for table '{table}' failed: {source}")]
    Schema {
        table: String,
        #[source]
        source: DbError,
    },

    /// Core error, e.g. malformed installed-component options (M005)
    #[error("[M005] {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
