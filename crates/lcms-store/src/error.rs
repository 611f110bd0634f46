use crate::key::DocumentKey;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is not a valid document name.
    #[error("invalid document key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// The stored document exists but cannot be decoded.
    #[error("corrupted document {key}: {reason}")]
    Corrupted { key: DocumentKey, reason: String },

    /// A value could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding a document was poisoned by a panicking writer.
    #[error("lock poisoned for {0}")]
    LockPoisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
