//! Configuration types and parsing for plinth.yml

use crate::dependencies::DependencyConfig;
use crate::error::{CoreError, CoreResult};
use crate::repo_name::RepoName;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Repo configuration from plinth.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Repo name, used to namespace option keys
    pub name: RepoName,

    /// Human-readable title (defaults to the name)
    #[serde(default)]
    pub title: Option<String>,

    /// Root prefix stripped from migration file paths to build identifiers.
    ///
    /// Relative to the repo directory. Defaults to the parent directory so
    /// identifiers include the repo directory name and stay unique across
    /// repos sharing one option store.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Directory holding `*.sql` migration files, relative to the repo directory
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// How migration files are split into statements
    #[serde(default)]
    pub statement_splitting: SplitMode,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Required theme and plugins
    #[serde(default)]
    pub dependencies: DependencyConfig,

    /// Tables managed by the schema manager
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Statement splitting strategy for migration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Split on every `;` followed by a newline, even inside string literals
    #[default]
    Legacy,
    /// Ignore `;` + newline inside quotes and comments
    QuoteAware,
}

impl std::fmt::Display for SplitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitMode::Legacy => write!(f, "legacy"),
            SplitMode::QuoteAware => write!(f, "quote_aware"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file, or `:memory:`). Defaults to `plinth.duckdb`
    /// so the option store outlives the process.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether this configuration points at an in-memory database
    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_DB_PATH
    }
}

/// Schema manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Prefix prepended to every table name
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,

    /// Trailing table options appended to each CREATE TABLE (charset, collation, ...)
    #[serde(default)]
    pub table_options: Option<String>,

    /// Table definitions, created in declaration order
    #[serde(default)]
    pub tables: Vec<TableDef>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            table_prefix: default_table_prefix(),
            table_options: None,
            tables: Vec::new(),
        }
    }
}

/// A single managed table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDef {
    /// Unprefixed table name
    pub name: String,

    /// Column and constraint lines, e.g. `id INTEGER PRIMARY KEY`
    pub columns: Vec<String>,
}

const MEMORY_DB_PATH: &str = ":memory:";

/// Default DuckDB file, relative to the repo directory
pub const DEFAULT_DB_PATH: &str = "plinth.duckdb";

fn default_content_dir() -> String {
    "..".to_string()
}

fn default_migrations_path() -> String {
    "migrations".to_string()
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_table_prefix() -> String {
    "wp_".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config for {} from {}", config.name, path.display());
        Ok(config)
    }

    /// Load configuration from a repo directory
    /// Looks for plinth.yml or plinth.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        if !dir.is_dir() {
            return Err(CoreError::RepoNotFound {
                path: dir.display().to_string(),
            });
        }

        let yml_path = dir.join("plinth.yml");
        let yaml_path = dir.join("plinth.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.migrations_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_path cannot be empty".to_string(),
            });
        }

        if !is_identifier_fragment(&self.schema.table_prefix) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "schema.table_prefix '{}' may only contain letters, digits and underscores",
                    self.schema.table_prefix
                ),
            });
        }

        let mut seen = HashSet::new();
        for table in &self.schema.tables {
            if table.name.is_empty() || !is_identifier_fragment(&table.name) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("invalid table name '{}' in schema.tables", table.name),
                });
            }
            if table.columns.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("table '{}' must declare at least one column", table.name),
                });
            }
            if !seen.insert(table.name.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("duplicate table '{}' in schema.tables", table.name),
                });
            }
        }

        self.dependencies.validate()
    }

    /// Title for display, falling back to the repo name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.name.as_str())
    }

    /// Absolute path of the migrations directory
    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_path)
    }

    /// Absolute path of the content root used for migration identifiers
    pub fn content_root_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.content_dir)
    }

    /// Database path resolved against the repo directory (`:memory:` is kept as-is)
    pub fn database_path_absolute(&self, root: &Path) -> String {
        if self.database.is_memory() || Path::new(&self.database.path).is_absolute() {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }
}

fn is_identifier_fragment(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
