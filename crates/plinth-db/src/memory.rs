//! In-memory option store

use crate::error::{DbError, DbResult};
use crate::traits::OptionStore;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Option store backed by a `HashMap`, for tests and throwaway runs
#[derive(Debug, Default)]
pub struct MemoryOptionStore {
    options: Mutex<HashMap<String, Value>>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `options`
    pub fn with_options<I, K>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            options: Mutex::new(options.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, HashMap<String, Value>>> {
        self.options
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn get_option(&self, name: &str) -> DbResult<Option<Value>> {
        Ok(self.lock()?.get(name).cloned())
    }

    async fn update_option(&self, name: &str, value: &Value) -> DbResult<()> {
        self.lock()?.insert(name.to_string(), value.clone());
        Ok(())
    }

    async fn delete_option(&self, name: &str) -> DbResult<bool> {
        Ok(self.lock()?.remove(name).is_some())
    }

    async fn compare_and_set(
        &self,
        name: &str,
        expected: Option<&Value>,
        new: &Value,
    ) -> DbResult<bool> {
        let mut options = self.lock()?;
        if options.get(name) != expected {
            return Ok(false);
        }
        options.insert(name.to_string(), new.clone());
        Ok(true)
    }
}
