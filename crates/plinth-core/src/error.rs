//! Error types for plinth-core

use thiserror::Error;

/// Core error type for Plinth
#[derive(Error, Debug)]
pub enum CoreError {
    /// P001: Configuration file not found
    #[error("[P001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// P002: Failed to parse configuration file
    #[error("[P002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// P003: Invalid configuration value
    #[error("[P003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// P004: Repo directory not found
    #[error("[P004] Repo directory not found: {path}")]
    RepoNotFound { path: String },

    /// P005: IO error with file path context
    #[error("[P005] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// P007: Installed component data in the option store is malformed
    #[error("[P007] Malformed '{option}' option: {source}")]
    MalformedOption {
        option: String,
        source: serde_json::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}
