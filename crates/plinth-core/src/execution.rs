//! Execution context flags
//!
//! Migrations only run from interactive requests. Background modes (ajax
//! handlers, scheduled cron runs, command-line invocations) skip them.

/// Env var marking an ajax request
pub const DOING_AJAX_ENV: &str = "PLINTH_DOING_AJAX";

/// Env var marking a scheduled cron run
pub const DOING_CRON_ENV: &str = "PLINTH_DOING_CRON";

/// Env var marking a command-line invocation
pub const CLI_ENV: &str = "PLINTH_CLI";

/// Which execution mode the current process is in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub doing_ajax: bool,
    pub doing_cron: bool,
    pub cli: bool,
}

impl ExecutionContext {
    /// Interactive context: all background flags unset
    pub fn interactive() -> Self {
        Self::default()
    }

    /// Read the flags from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the flags through an arbitrary lookup (used by `from_env` and tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).is_some_and(|v| is_truthy(&v));
        Self {
            doing_ajax: flag(DOING_AJAX_ENV),
            doing_cron: flag(DOING_CRON_ENV),
            cli: flag(CLI_ENV),
        }
    }

    /// Migrations run only when no background flag is set
    pub fn allows_migrations(&self) -> bool {
        !(self.doing_ajax || self.doing_cron || self.cli)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn context_from(vars: &[(&str, &str)]) -> ExecutionContext {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExecutionContext::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_interactive_allows_migrations() {
        assert!(ExecutionContext::interactive().allows_migrations());
        assert!(context_from(&[]).allows_migrations());
    }

    #[test]
    fn test_each_background_flag_blocks_migrations() {
        for key in [DOING_AJAX_ENV, DOING_CRON_ENV, CLI_ENV] {
            let ctx = context_from(&[(key, "1")]);
            assert!(!ctx.allows_migrations(), "{key} should block migrations");
        }
    }

    #[test]
    fn test_falsy_values_are_ignored() {
        let ctx = context_from(&[(DOING_CRON_ENV, "0"), (CLI_ENV, "false"), (DOING_AJAX_ENV, "")]);
        assert!(ctx.allows_migrations());

        let ctx = context_from(&[(CLI_ENV, " Yes ")]);
        assert!(ctx.cli);
    }
}
