//! Per-repo "migrations running" flag
//!
//! The flag is advisory: it has no expiry and no owner. If a run dies after
//! acquiring it, every later run for that repo is skipped until the flag is
//! cleared by hand (`plinth unlock`).

use crate::error::MigrateResult;
use plinth_core::RepoName;
use plinth_db::OptionStore;
use serde_json::Value;

/// Value stored while a run is in flight
pub const RUNNING_SENTINEL: &str = "running";

/// Option key of the running flag for `repo`
pub fn running_flag_option(repo: &RepoName) -> String {
    format!("plinth_migrations_running_{repo}")
}

/// Read the raw flag value
pub async fn read_flag(store: &dyn OptionStore, repo: &RepoName) -> MigrateResult<Option<Value>> {
    Ok(store.get_option(&running_flag_option(repo)).await?)
}

/// Whether a raw flag value means "a run is in flight".
///
/// Anything other than the sentinel string (including `null` or `""` left by
/// older clears) counts as unset.
pub fn is_running(flag: Option<&Value>) -> bool {
    matches!(flag, Some(Value::String(s)) if s == RUNNING_SENTINEL)
}

/// Set the flag if it still holds `observed`, the value read earlier.
///
/// Returns `false` if another caller changed it in between.
pub async fn acquire(
    store: &dyn OptionStore,
    repo: &RepoName,
    observed: Option<&Value>,
) -> MigrateResult<bool> {
    let running = Value::String(RUNNING_SENTINEL.to_string());
    Ok(store
        .compare_and_set(&running_flag_option(repo), observed, &running)
        .await?)
}

/// Clear the flag. Returns whether a flag was stored.
pub async fn release(store: &dyn OptionStore, repo: &RepoName) -> MigrateResult<bool> {
    Ok(store.delete_option(&running_flag_option(repo)).await?)
}
