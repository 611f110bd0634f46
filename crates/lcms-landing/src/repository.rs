//! The landing repository: canonical documents plus the listing index.

use std::sync::Arc;

use tracing::{debug, info, warn};

use lcms_store::{DocumentKey, Documents, StoreError, StoreResult};
use lcms_types::{Clock, IdGenerator, LandingId};

use crate::error::{LandingError, LandingResult};
use crate::model::{Landing, LandingContent, LandingIndexEntry, LandingPatch, NewLanding};

/// Where landing documents live in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandingKeys {
    /// The shared index array document.
    pub index: DocumentKey,
    /// Prefix under which each canonical document is stored by id.
    pub documents: DocumentKey,
}

impl LandingKeys {
    pub fn new(index: &str, documents: &str) -> StoreResult<Self> {
        Ok(Self {
            index: DocumentKey::new(index)?,
            documents: DocumentKey::new(documents)?,
        })
    }

    /// The canonical document key for `id`.
    pub fn document(&self, id: &LandingId) -> StoreResult<DocumentKey> {
        if !id.is_valid() {
            return Err(StoreError::InvalidKey {
                key: id.to_string(),
                reason: "not a valid landing id".into(),
            });
        }
        self.documents.child(id.as_str())
    }

    /// Lookup form of [`document`](Self::document): an id that can't name a
    /// document names no landing.
    fn landing(&self, id: &LandingId) -> LandingResult<DocumentKey> {
        self.document(id).map_err(|_| LandingError::not_found(id))
    }
}

impl Default for LandingKeys {
    fn default() -> Self {
        Self {
            index: DocumentKey::new("landing-index").expect("static key is valid"),
            documents: DocumentKey::new("landings").expect("static key is valid"),
        }
    }
}

/// Result of [`LandingRepository::update`].
#[derive(Clone, Debug, PartialEq)]
pub struct UpdatedLanding {
    pub landing: Landing,
    /// The slug before the update; differs from `landing.slug` on a rename.
    pub previous_slug: String,
}

impl UpdatedLanding {
    pub fn slug_changed(&self) -> bool {
        self.previous_slug != self.landing.slug
    }
}

/// Owns canonical landing documents and the denormalized index.
///
/// Create and update run inside the index's critical section, so the slug
/// uniqueness check and the writes it guards cannot interleave with another
/// create or update. Canonical documents for different ids are independent.
pub struct LandingRepository {
    docs: Documents,
    keys: LandingKeys,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for LandingRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandingRepository")
            .field("keys", &self.keys)
            .finish()
    }
}

fn require(value: &str, field: &'static str) -> LandingResult<()> {
    if value.trim().is_empty() {
        return Err(LandingError::Validation { field });
    }
    Ok(())
}

impl LandingRepository {
    pub fn new(
        docs: Documents,
        keys: LandingKeys,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            docs,
            keys,
            clock,
            ids,
        }
    }

    pub fn keys(&self) -> &LandingKeys {
        &self.keys
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// All index entries, in creation order.
    pub fn get_all(&self) -> LandingResult<Vec<LandingIndexEntry>> {
        Ok(self.docs.read_or(&self.keys.index, Vec::new)?)
    }

    /// The canonical document for `id`.
    pub fn get_by_id(&self, id: &LandingId) -> LandingResult<Landing> {
        let key = self.keys.landing(id)?;
        self.docs
            .read(&key)?
            .ok_or_else(|| LandingError::not_found(id))
    }

    /// The index entry whose slug matches exactly, if any.
    pub fn find_by_slug(&self, slug: &str) -> LandingResult<Option<LandingIndexEntry>> {
        Ok(self.get_all()?.into_iter().find(|e| e.slug == slug))
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Create a landing with the default content template.
    ///
    /// Writes the canonical document first, then appends its index entry.
    pub fn create(&self, fields: NewLanding) -> LandingResult<Landing> {
        require(&fields.name, "name")?;
        require(&fields.slug, "slug")?;

        self.docs.update(
            &self.keys.index,
            Vec::new,
            |index: &mut Vec<LandingIndexEntry>| {
                if index.iter().any(|e| e.slug == fields.slug) {
                    return Err(LandingError::DuplicateSlug { slug: fields.slug });
                }

                let now = self.clock.now();
                let landing = Landing {
                    id: LandingId::generate(self.ids.as_ref()),
                    slug: fields.slug,
                    name: fields.name,
                    menu_category: fields.menu_category.unwrap_or_default(),
                    is_featured: fields.is_featured,
                    created_at: now,
                    updated_at: now,
                    content: LandingContent::default(),
                };

                self.docs.write(&self.keys.document(&landing.id)?, &landing)?;
                index.push(LandingIndexEntry::from(&landing));

                info!(id = %landing.id, slug = %landing.slug, "landing created");
                Ok(landing)
            },
        )
    }

    /// Shallow-merge `patch` into the landing and refresh its index entry.
    ///
    /// `id` cannot change and `updatedAt` is always stamped. If the index has
    /// no entry for the id, the index is left as it was.
    pub fn update(&self, id: &LandingId, patch: LandingPatch) -> LandingResult<UpdatedLanding> {
        if let Some(name) = &patch.name {
            require(name, "name")?;
        }
        if let Some(slug) = &patch.slug {
            require(slug, "slug")?;
        }
        let key = self.keys.landing(id)?;

        self.docs.update_if(
            &self.keys.index,
            Vec::new,
            |index: &mut Vec<LandingIndexEntry>| {
                if let Some(slug) = &patch.slug {
                    if index.iter().any(|e| e.slug == *slug && e.id != *id) {
                        return Err(LandingError::DuplicateSlug { slug: slug.clone() });
                    }
                }

                let now = self.clock.now();
                let updated = self
                    .docs
                    .update_existing(&key, |landing: &mut Landing| {
                        let previous_slug = landing.slug.clone();
                        landing.apply(patch);
                        landing.id = id.clone();
                        landing.updated_at = now;
                        Ok::<_, LandingError>(UpdatedLanding {
                            landing: landing.clone(),
                            previous_slug,
                        })
                    })?
                    .ok_or_else(|| LandingError::not_found(id))?;

                let indexed = match index.iter_mut().find(|e| e.id == *id) {
                    Some(entry) => {
                        *entry = LandingIndexEntry::from(&updated.landing);
                        true
                    }
                    None => {
                        warn!(%id, "index has no entry for updated landing");
                        false
                    }
                };

                info!(
                    %id,
                    slug = %updated.landing.slug,
                    renamed = updated.slug_changed(),
                    "landing updated"
                );
                Ok((updated, indexed))
            },
        )
    }

    /// Delete a landing and its index entry.
    ///
    /// Returns the deleted landing's slug, or `None` if it was already gone.
    /// Any stray index entry for the id is removed either way.
    pub fn delete(&self, id: &LandingId) -> LandingResult<Option<String>> {
        let key = match self.keys.landing(id) {
            Ok(key) => key,
            Err(LandingError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let removed: Option<Landing> = self.docs.take(&key)?;

        let scrubbed = self.docs.update(
            &self.keys.index,
            Vec::new,
            |index: &mut Vec<LandingIndexEntry>| {
                let before = index.len();
                index.retain(|e| e.id != *id);
                Ok::<_, LandingError>(before - index.len())
            },
        )?;

        match &removed {
            Some(landing) => info!(%id, slug = %landing.slug, "landing deleted"),
            None if scrubbed > 0 => warn!(%id, "removed index entry for missing landing"),
            None => debug!(%id, "landing already absent"),
        }
        Ok(removed.map(|landing| landing.slug))
    }
}
