//! plinth-core - Core library for Plinth
//!
//! This crate provides the shared types used across all Plinth components:
//! the `plinth.yml` configuration, strongly-typed repo and migration
//! identifiers, the execution context that gates migrations, and the
//! theme/plugin dependency checker.

pub mod config;
pub mod dependencies;
pub mod error;
pub mod execution;
pub mod migration_id;
mod newtype_string;
pub mod repo_name;

pub use config::{Config, DatabaseConfig, SchemaConfig, SplitMode, TableDef};
pub use dependencies::{ActiveTheme, DependencyConfig, DependencyReport, InstalledComponents};
pub use error::{CoreError, CoreResult};
pub use execution::ExecutionContext;
pub use migration_id::MigrationId;
pub use repo_name::RepoName;
