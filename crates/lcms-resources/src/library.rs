use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lcms_store::{DocumentKey, Documents};
use lcms_types::{IdGenerator, ResourceId};

use crate::error::{ResourceError, ResourceResult};

/// One downloadable resource offered on landing pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Empty on input means "assign one".
    #[serde(default)]
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub button_text: String,
}

impl ResourceDescriptor {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: ResourceId) -> Self {
        self.id = id;
        self
    }
}

/// The shared resource collection.
pub struct ResourceLibrary {
    docs: Documents,
    key: DocumentKey,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for ResourceLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLibrary")
            .field("key", &self.key)
            .finish()
    }
}

impl ResourceLibrary {
    pub fn new(docs: Documents, key: DocumentKey, ids: Arc<dyn IdGenerator>) -> Self {
        Self { docs, key, ids }
    }

    /// Every descriptor, in insertion order.
    pub fn list(&self) -> ResourceResult<Vec<ResourceDescriptor>> {
        Ok(self.docs.read_or(&self.key, Vec::new)?)
    }

    pub fn get(&self, id: &ResourceId) -> ResourceResult<ResourceDescriptor> {
        self.list()?
            .into_iter()
            .find(|r| r.id == *id)
            .ok_or_else(|| ResourceError::NotFound { id: id.to_string() })
    }

    /// Replace the descriptor with the same id in place, or append it.
    ///
    /// A descriptor with an empty id is assigned a fresh one and appended.
    pub fn upsert(&self, mut descriptor: ResourceDescriptor) -> ResourceResult<ResourceDescriptor> {
        if descriptor.title.trim().is_empty() {
            return Err(ResourceError::Validation { field: "title" });
        }
        if descriptor.id.as_str().is_empty() {
            descriptor.id = ResourceId::generate(self.ids.as_ref());
        }

        self.docs.update(
            &self.key,
            Vec::new,
            |resources: &mut Vec<ResourceDescriptor>| {
                match resources.iter_mut().find(|r| r.id == descriptor.id) {
                    Some(existing) => {
                        *existing = descriptor.clone();
                        debug!(id = %descriptor.id, "resource replaced");
                    }
                    None => {
                        resources.push(descriptor.clone());
                        info!(id = %descriptor.id, title = %descriptor.title, "resource added");
                    }
                }
                Ok::<_, ResourceError>(descriptor)
            },
        )
    }

    /// Remove a descriptor. Returns `false` if none had this id.
    ///
    /// Landings that still list the id keep it.
    pub fn delete(&self, id: &ResourceId) -> ResourceResult<bool> {
        let removed = self.docs.update_if(
            &self.key,
            Vec::new,
            |resources: &mut Vec<ResourceDescriptor>| {
                let before = resources.len();
                resources.retain(|r| r.id != *id);
                let removed = resources.len() < before;
                Ok::<_, ResourceError>((removed, removed))
            },
        )?;
        if removed {
            info!(%id, "resource deleted");
        }
        Ok(removed)
    }
}
