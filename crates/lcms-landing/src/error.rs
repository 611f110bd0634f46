use lcms_store::StoreError;
use lcms_types::LandingId;
use thiserror::Error;

/// Errors from landing repository operations.
#[derive(Debug, Error)]
pub enum LandingError {
    /// A required field is missing or empty. Nothing was written.
    #[error("invalid landing: {field} must not be empty")]
    Validation { field: &'static str },

    /// Another landing already uses this slug. Nothing was written.
    #[error("slug already in use: {slug}")]
    DuplicateSlug { slug: String },

    /// No landing exists with this id.
    #[error("landing not found: {id}")]
    NotFound { id: String },

    /// The underlying document store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl LandingError {
    pub(crate) fn not_found(id: &LandingId) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}

/// Convenience alias for landing results.
pub type LandingResult<T> = Result<T, LandingError>;
