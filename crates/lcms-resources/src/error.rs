use lcms_store::StoreError;
use thiserror::Error;

/// Errors from resource library operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A required field is missing or empty. Nothing was written.
    #[error("invalid resource: {field} must not be empty")]
    Validation { field: &'static str },

    #[error("resource not found: {id}")]
    NotFound { id: String },

    /// The underlying document store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type ResourceResult<T> = Result<T, ResourceError>;
