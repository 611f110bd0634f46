//! Landing documents and their index projection.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use lcms_types::{LandingId, ResourceId, Timestamp};

/// The canonical document for one landing page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landing {
    pub id: LandingId,
    /// Public URL path and the join key into the menu.
    pub slug: String,
    pub name: String,
    /// Label of the menu category this landing is linked under, or empty.
    #[serde(default)]
    pub menu_category: String,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub content: LandingContent,
}

/// Page content. Only `hero` (mirrored into the index) and the resource
/// selection are interpreted here; every section is otherwise opaque.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingContent {
    #[serde(default)]
    pub hero: Value,
    #[serde(default)]
    pub form: Value,
    #[serde(default)]
    pub coverage: Value,
    #[serde(default)]
    pub benefits: Value,
    #[serde(default)]
    pub faq: Value,
    #[serde(default)]
    pub resources: ResourceSelection,
    /// Sections this crate does not know about, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LandingContent {
    /// The empty template every new landing starts from, so that a freshly
    /// created landing renders without further edits.
    fn default() -> Self {
        Self {
            hero: json!({ "title": "", "subtitle": "", "image": "", "ctaText": "" }),
            form: json!({ "title": "", "fields": [] }),
            coverage: json!({ "title": "", "items": [] }),
            benefits: json!({ "title": "", "items": [] }),
            faq: json!({ "title": "", "items": [] }),
            resources: ResourceSelection::default(),
            extra: Map::new(),
        }
    }
}

/// Resource library entries shown on a landing, by id only.
///
/// Ids are not checked against the library; a deleted resource leaves a
/// dangling id here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSelection {
    #[serde(default)]
    pub enabled_resource_ids: Vec<ResourceId>,
}

/// One row of the listing index: a projection of [`Landing`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingIndexEntry {
    pub id: LandingId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub menu_category: String,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub hero: Value,
}

impl From<&Landing> for LandingIndexEntry {
    fn from(landing: &Landing) -> Self {
        Self {
            id: landing.id.clone(),
            name: landing.name.clone(),
            slug: landing.slug.clone(),
            menu_category: landing.menu_category.clone(),
            is_featured: landing.is_featured,
            created_at: landing.created_at,
            updated_at: landing.updated_at,
            hero: landing.content.hero.clone(),
        }
    }
}

impl LandingIndexEntry {
    /// Returns `true` if every mirrored field equals `landing`'s.
    pub fn mirrors(&self, landing: &Landing) -> bool {
        *self == Self::from(landing)
    }
}

/// Fields accepted when creating a landing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLanding {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub menu_category: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

impl NewLanding {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            ..Default::default()
        }
    }

    pub fn with_menu_category(mut self, category: impl Into<String>) -> Self {
        self.menu_category = Some(category.into());
        self
    }

    pub fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }
}

/// A shallow partial update. Present fields replace the stored value
/// wholesale; `content` is never merged section by section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<LandingContent>,
}

impl LandingPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Landing {
    /// Apply a shallow patch. `id` and timestamps are untouched; the caller
    /// stamps `updated_at`.
    pub fn apply(&mut self, patch: LandingPatch) {
        let LandingPatch {
            name,
            slug,
            menu_category,
            is_featured,
            content,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(slug) = slug {
            self.slug = slug;
        }
        if let Some(menu_category) = menu_category {
            self.menu_category = menu_category;
        }
        if let Some(is_featured) = is_featured {
            self.is_featured = is_featured;
        }
        if let Some(content) = content {
            self.content = content;
        }
    }
}
