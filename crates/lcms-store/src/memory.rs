use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::key::DocumentKey;
use crate::traits::DocumentBackend;

/// In-memory, HashMap-based document backend.
///
/// Intended for tests and embedding. Data is lost when the backend is dropped.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    documents: RwLock<HashMap<DocumentKey, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns `true` if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of all stored keys.
    pub fn keys(&self) -> Vec<DocumentKey> {
        let mut keys: Vec<DocumentKey> = self
            .documents
            .read()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

fn poisoned(e: impl std::fmt::Display) -> StoreError {
    StoreError::LockPoisoned(format!("in-memory backend: {e}"))
}

impl DocumentBackend for InMemoryBackend {
    fn load(&self, key: &DocumentKey) -> StoreResult<Option<Vec<u8>>> {
        let documents = self.documents.read().map_err(poisoned)?;
        Ok(documents.get(key).cloned())
    }

    fn save(&self, key: &DocumentKey, bytes: &[u8]) -> StoreResult<()> {
        let mut documents = self.documents.write().map_err(poisoned)?;
        documents.insert(key.clone(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &DocumentKey) -> StoreResult<bool> {
        let mut documents = self.documents.write().map_err(poisoned)?;
        Ok(documents.remove(key).is_some())
    }

    fn exists(&self, key: &DocumentKey) -> StoreResult<bool> {
        let documents = self.documents.read().map_err(poisoned)?;
        Ok(documents.contains_key(key))
    }
}
