use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lcms_landing::LandingKeys;
use lcms_store::{DocumentKey, StoreResult};

use crate::error::{CmsError, CmsResult};

/// Where the CMS keeps its documents.
///
/// Every field has a default, so an empty TOML file is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Root directory of the filesystem store.
    pub data_dir: PathBuf,
    pub documents: DocumentNames,
}

/// Logical document names inside the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentNames {
    pub landing_index: String,
    /// Prefix for canonical landing documents, one per id.
    pub landings: String,
    pub menu: String,
    pub resources: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            documents: DocumentNames::default(),
        }
    }
}

impl Default for DocumentNames {
    fn default() -> Self {
        Self {
            landing_index: "landing-index".into(),
            landings: "landings".into(),
            menu: "menu".into(),
            resources: "resources".into(),
        }
    }
}

impl CmsConfig {
    pub fn from_toml_str(raw: &str) -> CmsResult<Self> {
        toml::from_str(raw).map_err(|e| CmsError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> CmsResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| CmsError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Resolve the document names into store keys.
    pub fn layout(&self) -> StoreResult<DocumentLayout> {
        DocumentLayout::from_names(&self.documents)
    }
}

/// Validated store keys for every document the CMS owns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentLayout {
    pub landings: LandingKeys,
    pub menu: DocumentKey,
    pub resources: DocumentKey,
}

impl DocumentLayout {
    pub fn from_names(names: &DocumentNames) -> StoreResult<Self> {
        Ok(Self {
            landings: LandingKeys::new(&names.landing_index, &names.landings)?,
            menu: DocumentKey::new(&names.menu)?,
            resources: DocumentKey::new(&names.resources)?,
        })
    }
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            landings: LandingKeys::default(),
            menu: DocumentKey::new("menu").expect("static key is valid"),
            resources: DocumentKey::new("resources").expect("static key is valid"),
        }
    }
}
