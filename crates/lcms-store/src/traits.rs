use crate::error::StoreResult;
use crate::key::DocumentKey;

/// Raw byte storage for keyed documents.
///
/// All implementations must satisfy these invariants:
/// - `load` of a key that was never saved (or was removed) returns `Ok(None)`.
/// - `save` fully replaces prior content; a concurrent `load` observes either
///   the old bytes or the new bytes, never a mix.
/// - `remove` is idempotent.
/// - All I/O errors are propagated, never silently ignored.
///
/// Backends do not lock across calls. Cross-call atomicity is provided by
/// [`Documents`](crate::Documents).
pub trait DocumentBackend: Send + Sync {
    /// Read the raw bytes of a document.
    fn load(&self, key: &DocumentKey) -> StoreResult<Option<Vec<u8>>>;

    /// Replace the document with `bytes`, creating it if needed.
    fn save(&self, key: &DocumentKey, bytes: &[u8]) -> StoreResult<()>;

    /// Delete a document. Returns `true` if it existed.
    fn remove(&self, key: &DocumentKey) -> StoreResult<bool>;

    /// Check whether a document exists.
    fn exists(&self, key: &DocumentKey) -> StoreResult<bool> {
        Ok(self.load(key)?.is_some())
    }
}
