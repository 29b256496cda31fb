use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{FixtureError, FixtureSource};

/// In-memory fixtures for tests; unknown paths behave like a 404.
#[derive(Default)]
pub struct MemoryFixtureSource {
    documents: Mutex<HashMap<String, Value>>,
    fetches: AtomicUsize,
}

impl MemoryFixtureSource {
    pub fn with(self, path: &str, document: Value) -> Self {
        self.documents
            .lock()
            .expect("lock poisoned")
            .insert(path.to_string(), document);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FixtureSource for MemoryFixtureSource {
    async fn fetch(&self, path: &str) -> Result<Value, FixtureError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.documents
            .lock()
            .expect("lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| FixtureError::NotFound(path.to_string()))
    }
}
