//! Test doubles for the `Database` and `OptionStore` traits.
//!
//! Available to other crates via the `test-support` feature.

use crate::error::{DbError, DbResult};
use crate::memory::MemoryOptionStore;
use crate::traits::{Database, OptionStore};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Database that records every statement it is asked to execute.
///
/// Statements containing any of the configured failure markers return an
/// execution error (after being recorded), mimicking a server-side error.
#[derive(Debug, Default)]
pub struct RecordingDatabase {
    executed: Mutex<Vec<String>>,
    fail_markers: Vec<String>,
    relations: HashSet<String>,
}

impl RecordingDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any statement containing `marker`
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_markers.push(marker.into());
        self
    }

    /// Report `name` as an existing relation
    pub fn with_relation(mut self, name: impl Into<String>) -> Self {
        self.relations.insert(name.into());
        self
    }

    /// All statements executed so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Database for RecordingDatabase {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.executed
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?
            .push(sql.to_string());
        if let Some(marker) = self.fail_markers.iter().find(|m| sql.contains(m.as_str())) {
            return Err(DbError::ExecutionError(format!(
                "simulated failure on '{marker}': {sql}"
            )));
        }
        Ok(0)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        Ok(self.relations.contains(name))
    }

    fn db_type(&self) -> &'static str {
        "recording"
    }
}

/// In-memory option store that counts reads and writes
#[derive(Debug, Default)]
pub struct CountingOptionStore {
    inner: MemoryOptionStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options<I, K>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            inner: MemoryOptionStore::with_options(options),
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OptionStore for CountingOptionStore {
    async fn get_option(&self, name: &str) -> DbResult<Option<Value>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_option(name).await
    }

    async fn update_option(&self, name: &str, value: &Value) -> DbResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_option(name, value).await
    }

    async fn delete_option(&self, name: &str) -> DbResult<bool> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_option(name).await
    }

    async fn compare_and_set(
        &self,
        name: &str,
        expected: Option<&Value>,
        new: &Value,
    ) -> DbResult<bool> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.compare_and_set(name, expected, new).await
    }
}
