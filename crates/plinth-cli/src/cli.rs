//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Plinth - SQL migrations and dependency checks for pluggable repos
#[derive(Parser, Debug)]
#[command(name = "plinth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the repo directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path (paths in it resolve against its directory)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Boot the repo: check dependencies, then migrate if the environment allows it
    Boot,

    /// Apply pending migrations regardless of execution mode
    Migrate(MigrateArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),

    /// Clear a stuck "migrations running" flag
    Unlock,

    /// Check theme and plugin dependencies
    Deps,

    /// Manage declared tables
    Schema(SchemaArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// List pending migrations without executing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable listing
    Table,
    /// JSON output
    Json,
}

/// Arguments for the schema command
#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommands,
}

/// Schema subcommands
#[derive(Subcommand, Debug)]
pub enum SchemaCommands {
    /// Create declared tables (CREATE TABLE IF NOT EXISTS)
    Create,

    /// Drop declared tables (DROP TABLE IF EXISTS)
    Drop,

    /// List declared tables that do not exist yet
    Status,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
