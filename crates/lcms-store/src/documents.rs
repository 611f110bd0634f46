//! The typed document store shared by every repository.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::key::DocumentKey;
use crate::locks::KeyLocks;
use crate::memory::InMemoryBackend;
use crate::traits::DocumentBackend;

/// Typed JSON access to keyed documents with per-key serialization.
///
/// Plain [`read`](Self::read)s do not take the key lock: backends guarantee a
/// read sees a whole document. Anything that writes takes the lock for its
/// key, and [`update`](Self::update) holds it across the full
/// read → mutate → write sequence.
///
/// Cloning is cheap and clones share both backend and lock table.
#[derive(Clone)]
pub struct Documents {
    backend: Arc<dyn DocumentBackend>,
    locks: Arc<KeyLocks>,
}

impl fmt::Debug for Documents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Documents")
            .field("locked_keys", &self.locks.len())
            .finish()
    }
}

impl Documents {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            locks: Arc::new(KeyLocks::new()),
        }
    }

    /// A store over a fresh [`InMemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBackend::new()))
    }

    pub fn backend(&self) -> &Arc<dyn DocumentBackend> {
        &self.backend
    }

    // ---------------------------------------------------------------
    // Unlocked primitives
    // ---------------------------------------------------------------

    fn decode<T: DeserializeOwned>(key: &DocumentKey, bytes: &[u8]) -> StoreResult<T> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupted {
            key: key.clone(),
            reason: e.to_string(),
        })
    }

    fn load_unlocked<T: DeserializeOwned>(&self, key: &DocumentKey) -> StoreResult<Option<T>> {
        match self.backend.load(key)? {
            Some(bytes) => Self::decode(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn save_unlocked<T: Serialize>(&self, key: &DocumentKey, doc: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.save(key, &bytes)?;
        debug!(%key, len = bytes.len(), "document written");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// Read a document. Missing documents are `Ok(None)`; malformed ones fail
    /// with [`StoreError::Corrupted`].
    pub fn read<T: DeserializeOwned>(&self, key: &DocumentKey) -> StoreResult<Option<T>> {
        self.load_unlocked(key)
    }

    /// Read a document, falling back to `default` if it does not exist yet.
    pub fn read_or<T: DeserializeOwned>(
        &self,
        key: &DocumentKey,
        default: impl FnOnce() -> T,
    ) -> StoreResult<T> {
        Ok(self.load_unlocked(key)?.unwrap_or_else(default))
    }

    pub fn exists(&self, key: &DocumentKey) -> StoreResult<bool> {
        self.backend.exists(key)
    }

    // ---------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------

    /// Replace a document wholesale.
    pub fn write<T: Serialize>(&self, key: &DocumentKey, doc: &T) -> StoreResult<()> {
        self.locks.with_key(key, || self.save_unlocked(key, doc))?
    }

    /// Delete a document. Returns `true` if it existed.
    pub fn remove(&self, key: &DocumentKey) -> StoreResult<bool> {
        let existed = self.locks.with_key(key, || self.backend.remove(key))??;
        self.locks.release(key)?;
        Ok(existed)
    }

    /// Read and delete a document in one critical section.
    ///
    /// A document that exists but cannot be decoded is left in place and
    /// reported as corrupted.
    pub fn take<T: DeserializeOwned>(&self, key: &DocumentKey) -> StoreResult<Option<T>> {
        let taken = self.locks.with_key(key, || -> StoreResult<Option<T>> {
            let Some(doc) = self.load_unlocked::<T>(key)? else {
                return Ok(None);
            };
            self.backend.remove(key)?;
            Ok(Some(doc))
        })??;
        self.locks.release(key)?;
        Ok(taken)
    }

    /// Append one item to an array document, creating it if absent.
    pub fn append<T>(&self, key: &DocumentKey, item: T) -> StoreResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.update(key, Vec::new, |items: &mut Vec<T>| {
            items.push(item);
            Ok::<_, StoreError>(())
        })
    }

    /// Locked read-modify-write.
    ///
    /// Loads the document (or `default()` if absent), hands it to `mutate`,
    /// and writes the result back if `mutate` succeeds. If `mutate` fails,
    /// nothing is written.
    pub fn update<T, R, E>(
        &self,
        key: &DocumentKey,
        default: impl FnOnce() -> T,
        mutate: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError>,
    {
        self.update_if(key, default, |doc: &mut T| {
            mutate(doc).map(|out| (out, true))
        })
    }

    /// Like [`update`](Self::update), but `mutate` also reports whether it
    /// changed the document. An unchanged document is not written back, so a
    /// missing one stays missing.
    pub fn update_if<T, R, E>(
        &self,
        key: &DocumentKey,
        default: impl FnOnce() -> T,
        mutate: impl FnOnce(&mut T) -> Result<(R, bool), E>,
    ) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError>,
    {
        self.locks.with_key(key, || -> Result<R, E> {
            let mut doc: T = self.load_unlocked(key)?.unwrap_or_else(default);
            let (out, changed) = mutate(&mut doc)?;
            if changed {
                self.save_unlocked(key, &doc)?;
            }
            Ok(out)
        })?
    }

    /// Like [`update`](Self::update), but for documents that must already
    /// exist. Returns `Ok(None)` without writing if the document is absent.
    pub fn update_existing<T, R, E>(
        &self,
        key: &DocumentKey,
        mutate: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<Option<R>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError>,
    {
        self.locks.with_key(key, || -> Result<Option<R>, E> {
            let Some(mut doc) = self.load_unlocked::<T>(key)? else {
                return Ok(None);
            };
            let out = mutate(&mut doc)?;
            self.save_unlocked(key, &doc)?;
            Ok(Some(out))
        })?
    }
}
