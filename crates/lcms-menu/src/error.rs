use lcms_store::StoreError;

/// Errors from menu operations.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// A replacement menu is not a well-formed forest.
    #[error("invalid menu node at {path}: {reason}")]
    Invalid { path: String, reason: String },

    /// The underlying document store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for menu results.
pub type MenuResult<T> = Result<T, MenuError>;
