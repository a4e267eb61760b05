//! Theme and plugin dependency checks
//!
//! A repo may require a specific theme to be active and a set of plugins to
//! be enabled. The installed state lives in the option store under
//! [`ACTIVE_PLUGINS_OPTION`] and [`ACTIVE_THEME_OPTION`]; this module only
//! interprets those values, it never reads storage itself.

use crate::error::{CoreError, CoreResult};
use crate::repo_name::RepoName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Option key holding the JSON array of active plugin paths
pub const ACTIVE_PLUGINS_OPTION: &str = "active_plugins";

/// Option key holding the active theme as `{ "name": .., "template": .. }`
pub const ACTIVE_THEME_OPTION: &str = "active_theme";

/// Dependencies declared in plinth.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyConfig {
    /// Theme that must be active (matched against the theme name or template)
    #[serde(default)]
    pub theme: Option<String>,

    /// Required plugins, friendly name -> plugin path (e.g. `Forms: forms/forms.php`)
    #[serde(default)]
    pub plugins: BTreeMap<String, String>,
}

impl DependencyConfig {
    pub(crate) fn validate(&self) -> CoreResult<()> {
        if let Some(theme) = &self.theme {
            if theme.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "dependencies.theme cannot be empty".to_string(),
                });
            }
        }
        for (name, path) in &self.plugins {
            if path.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("dependencies.plugins.{name} must name a plugin path"),
                });
            }
        }
        Ok(())
    }

    /// Whether any dependency is declared
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.plugins.is_empty()
    }
}

/// The currently active theme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTheme {
    pub name: String,

    /// Parent template for child themes; equals `name` for standalone themes
    #[serde(default)]
    pub template: String,
}

/// Installed state the dependency check runs against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledComponents {
    pub active_theme: Option<ActiveTheme>,
    pub active_plugins: Vec<String>,
}

impl InstalledComponents {
    /// Build from raw option values. Missing or `null` options mean "nothing installed".
    pub fn from_options(
        active_plugins: Option<serde_json::Value>,
        active_theme: Option<serde_json::Value>,
    ) -> CoreResult<Self> {
        let active_plugins = match active_plugins {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(value) => {
                serde_json::from_value(value).map_err(|e| CoreError::MalformedOption {
                    option: ACTIVE_PLUGINS_OPTION.to_string(),
                    source: e,
                })?
            }
        };
        let active_theme = match active_theme {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => {
                Some(
                    serde_json::from_value(value).map_err(|e| CoreError::MalformedOption {
                        option: ACTIVE_THEME_OPTION.to_string(),
                        source: e,
                    })?,
                )
            }
        };
        Ok(Self {
            active_theme,
            active_plugins,
        })
    }
}

/// Outcome of a dependency check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    /// One human-readable notice per unmet dependency
    pub notices: Vec<String>,
}

impl DependencyReport {
    /// True when every declared dependency is satisfied
    pub fn loaded(&self) -> bool {
        self.notices.is_empty()
    }
}

/// Check `deps` for `repo` against the installed components.
pub fn check(
    repo: &RepoName,
    deps: &DependencyConfig,
    installed: &InstalledComponents,
) -> DependencyReport {
    let mut notices = Vec::new();

    if let Some(theme) = &deps.theme {
        let active = installed
            .active_theme
            .as_ref()
            .is_some_and(|t| t.name == *theme || t.template == *theme);
        if !active {
            notices.push(format!(
                "The {theme} theme must be activated for the {repo} plugin to be enabled."
            ));
        }
    }

    for (name, path) in &deps.plugins {
        if !installed.active_plugins.iter().any(|p| p == path) {
            notices.push(format!(
                "The {name} plugin must be active for the {repo} plugin to be enabled"
            ));
        }
    }

    DependencyReport { notices }
}

#[cfg(test)]
#[path = "dependencies_test.rs"]
mod tests;
