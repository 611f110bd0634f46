//! Per-key serialization of read-modify-write sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::key::DocumentKey;

/// A table of mutexes, one per document key, created on first use.
///
/// Work on the same key runs one closure at a time; work on distinct keys
/// never contends beyond the brief table lookup. Entries for deleted
/// documents are dropped through [`release`](Self::release), so the table
/// tracks live keys rather than every key ever touched.
#[derive(Debug, Default)]
pub struct KeyLocks {
    table: Mutex<HashMap<DocumentKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, key: &DocumentKey) -> StoreResult<Arc<Mutex<()>>> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| StoreError::LockPoisoned("lock table".into()))?;
        Ok(Arc::clone(table.entry(key.clone()).or_default()))
    }

    /// Run `f` while holding the lock for `key`.
    ///
    /// Calls for the same key must not nest: the mutex is not reentrant.
    pub fn with_key<R>(&self, key: &DocumentKey, f: impl FnOnce() -> R) -> StoreResult<R> {
        let lock = self.lock_for(key)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned(key.to_string()))?;
        trace!(%key, "key lock held");
        Ok(f())
    }

    /// Drop the entry for `key` if no caller holds or waits on it.
    ///
    /// Handles are only cloned under the table lock, so a count of one means
    /// the table holds the sole reference.
    pub fn release(&self, key: &DocumentKey) -> StoreResult<bool> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| StoreError::LockPoisoned("lock table".into()))?;
        let idle = table
            .get(key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            table.remove(key);
            trace!(%key, "key lock released");
        }
        Ok(idle)
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.table.lock().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
