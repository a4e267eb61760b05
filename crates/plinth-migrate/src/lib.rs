//! plinth-migrate - Migration runner for Plinth
//!
//! Applies `*.sql` files from a repo's migrations directory exactly once,
//! statement by statement, tracking completion in the option store. Also
//! hosts the schema manager (declared tables) and the repo bootstrap that
//! ties dependency checks and migrations together.

pub mod completed;
pub mod discovery;
pub mod error;
pub mod guard;
pub mod repo;
pub mod runner;
pub mod schema;
pub mod statements;

pub use completed::{CompletedSet, COMPLETED_MIGRATIONS_OPTION};
pub use discovery::{discover_migrations, MigrationFile};
pub use error::{MigrateError, MigrateResult};
pub use repo::{check_dependencies, Repo};
pub use runner::{
    FileReport, MigrationReport, MigrationRunner, MigrationStatus, RunOutcome, StatementFailure,
};
pub use schema::SchemaManager;
pub use statements::split_statements;
