//! Persisted set of applied migration identifiers

use crate::error::{MigrateError, MigrateResult};
use plinth_core::MigrationId;
use plinth_db::OptionStore;
use serde_json::Value;

/// Option key holding the JSON array of completed migration identifiers.
///
/// Shared by every repo using the same option store.
pub const COMPLETED_MIGRATIONS_OPTION: &str = "plinth_completed_migrations";

/// Identifiers of migrations that have run at least once.
///
/// Append-only and insertion-ordered. Entries are never pruned, so a file
/// whose identifier is present will never run again even if its contents
/// change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedSet {
    ids: Vec<MigrationId>,
}

impl CompletedSet {
    /// Load from the option store; a missing option is an empty set.
    pub async fn load(store: &dyn OptionStore) -> MigrateResult<Self> {
        let value = store.get_option(COMPLETED_MIGRATIONS_OPTION).await?;
        Self::from_value(value)
    }

    /// Overwrite the stored set with this one.
    pub async fn save(&self, store: &dyn OptionStore) -> MigrateResult<()> {
        store
            .update_option(COMPLETED_MIGRATIONS_OPTION, &self.to_value())
            .await?;
        Ok(())
    }

    /// Interpret a raw option value.
    ///
    /// A bare string is treated as a one-element set; `null` as empty. Empty
    /// strings inside the array are skipped.
    pub fn from_value(value: Option<Value>) -> MigrateResult<Self> {
        let ids = match value {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(s)) => MigrationId::try_new(s).into_iter().collect(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(MigrationId::try_new(s)),
                    other => Err(MigrateError::MalformedCompletedSet(format!(
                        "expected string entries, found {other}"
                    ))),
                })
                .collect::<MigrateResult<Vec<_>>>()?
                .into_iter()
                .flatten()
                .collect(),
            Some(other) => {
                return Err(MigrateError::MalformedCompletedSet(format!(
                    "expected an array, found {other}"
                )))
            }
        };
        Ok(Self { ids })
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.ids
                .iter()
                .map(|id| Value::String(id.to_string()))
                .collect(),
        )
    }

    pub fn contains(&self, id: &MigrationId) -> bool {
        self.ids.contains(id)
    }

    /// Append `id` unless already present
    pub fn push(&mut self, id: MigrationId) {
        if !self.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MigrationId> {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_db::MemoryOptionStore;
    use serde_json::json;

    #[test]
    fn test_from_value_shapes() {
        assert!(CompletedSet::from_value(None).unwrap().is_empty());
        assert!(CompletedSet::from_value(Some(Value::Null)).unwrap().is_empty());

        let single = CompletedSet::from_value(Some(json!("/a/migrations/001.sql"))).unwrap();
        assert_eq!(single.len(), 1);

        let many = CompletedSet::from_value(Some(json!(["/a.sql", "", "/b.sql"]))).unwrap();
        let ids: Vec<&str> = many.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["/a.sql", "/b.sql"]);
    }

    #[test]
    fn test_from_value_rejects_malformed() {
        assert!(CompletedSet::from_value(Some(json!({"a": 1}))).is_err());
        assert!(CompletedSet::from_value(Some(json!([1, 2]))).is_err());
    }

    #[test]
    fn test_push_is_idempotent() {
        let mut set = CompletedSet::default();
        set.push(MigrationId::new("/a.sql"));
        set.push(MigrationId::new("/a.sql"));
        assert_eq!(set.len(), 1);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemoryOptionStore::new();
        let mut set = CompletedSet::default();
        set.push(MigrationId::new("/b.sql"));
        set.push(MigrationId::new("/a.sql"));
        set.save(&store).await.unwrap();

        assert_eq!(
            store.get_option(COMPLETED_MIGRATIONS_OPTION).await.unwrap(),
            Some(json!(["/b.sql", "/a.sql"]))
        );
        assert_eq!(CompletedSet::load(&store).await.unwrap(), set);
    }
}
