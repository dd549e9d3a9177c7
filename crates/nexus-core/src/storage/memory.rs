//! Process-local [`StateRepository`] for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Mutex;

use nexus_types::error::RepositoryError;

use super::state::StateRepository;

#[derive(Debug, Default)]
pub struct InMemoryStateRepository {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. to simulate state left by an earlier run.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.lock().insert(key.to_string(), value.to_string());
        self
    }

    /// Synchronous read for assertions.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StateRepository for InMemoryStateRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
