use lcms_landing::LandingError;
use lcms_menu::MenuError;
use lcms_resources::ResourceError;
use lcms_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Landing(#[from] LandingError),

    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CmsError {
    /// Returns `true` if the target of the operation does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CmsError::Landing(LandingError::NotFound { .. })
                | CmsError::Resource(ResourceError::NotFound { .. })
        )
    }

    /// Returns `true` if a stored document could not be parsed.
    pub fn is_corrupted(&self) -> bool {
        let store = match self {
            CmsError::Store(e) => e,
            CmsError::Landing(LandingError::Store(e)) => e,
            CmsError::Menu(MenuError::Store(e)) => e,
            CmsError::Resource(ResourceError::Store(e)) => e,
            _ => return false,
        };
        matches!(store, StoreError::Corrupted { .. })
    }
}

pub type CmsResult<T> = Result<T, CmsError>;
