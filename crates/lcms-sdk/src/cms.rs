use std::sync::Arc;

use tracing::info;

use lcms_landing::{Landing, LandingIndexEntry, LandingPatch, LandingRepository, NewLanding};
use lcms_menu::{Menu, MenuTree};
use lcms_resources::{ResourceDescriptor, ResourceLibrary};
use lcms_store::{Documents, FsBackend};
use lcms_types::{Clock, IdGenerator, LandingId, ResourceId, SystemClock, UuidV7Ids};

use crate::config::{CmsConfig, DocumentLayout};
use crate::coordinator::{Coordinator, Synced};
use crate::error::CmsResult;

/// High-level landing CMS API.
///
/// Landing mutations go through the [`Coordinator`], so the index and menu
/// follow every create, update and delete. Menu and resource calls act on
/// their documents directly.
pub struct Cms {
    docs: Documents,
    layout: DocumentLayout,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    coordinator: Coordinator,
    resources: ResourceLibrary,
}

impl std::fmt::Debug for Cms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cms").field("layout", &self.layout).finish()
    }
}

impl Cms {
    /// Open a filesystem-backed CMS rooted at `config.data_dir`.
    pub fn open(config: &CmsConfig) -> CmsResult<Self> {
        let layout = config.layout()?;
        let backend = FsBackend::new(&config.data_dir);
        info!(data_dir = %config.data_dir.display(), "cms opened");
        Ok(Self::new(Documents::new(Arc::new(backend)), layout))
    }

    /// A CMS over a fresh in-memory store with the default layout.
    pub fn in_memory() -> Self {
        Self::new(Documents::in_memory(), DocumentLayout::default())
    }

    /// A CMS over an existing store, using the system clock and v7 UUIDs.
    pub fn new(docs: Documents, layout: DocumentLayout) -> Self {
        Self::assemble(docs, layout, Arc::new(SystemClock), Arc::new(UuidV7Ids))
    }

    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self::assemble(self.docs, self.layout, clock, self.ids)
    }

    pub fn with_ids(self, ids: Arc<dyn IdGenerator>) -> Self {
        Self::assemble(self.docs, self.layout, self.clock, ids)
    }

    fn assemble(
        docs: Documents,
        layout: DocumentLayout,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let landings = LandingRepository::new(
            docs.clone(),
            layout.landings.clone(),
            clock.clone(),
            ids.clone(),
        );
        let menu = MenuTree::new(docs.clone(), layout.menu.clone());
        let resources = ResourceLibrary::new(docs.clone(), layout.resources.clone(), ids.clone());
        Self {
            docs,
            layout,
            clock,
            ids,
            coordinator: Coordinator::new(landings, menu),
            resources,
        }
    }

    pub fn documents(&self) -> &Documents {
        &self.docs
    }

    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    // ---- Landings ----

    pub fn list_landings(&self) -> CmsResult<Vec<LandingIndexEntry>> {
        Ok(self.coordinator.landings().get_all()?)
    }

    pub fn get_landing(&self, id: &LandingId) -> CmsResult<Landing> {
        Ok(self.coordinator.landings().get_by_id(id)?)
    }

    /// Create a landing with the default content template, linked under
    /// `menu_category` when that category exists in the menu.
    pub fn create_landing(
        &self,
        name: impl Into<String>,
        slug: impl Into<String>,
        menu_category: Option<String>,
    ) -> CmsResult<Synced<Landing>> {
        let fields = NewLanding {
            name: name.into(),
            slug: slug.into(),
            menu_category,
            is_featured: false,
        };
        self.create_landing_with(fields)
    }

    /// Like [`create_landing`](Self::create_landing) with every creation
    /// field exposed.
    pub fn create_landing_with(&self, fields: NewLanding) -> CmsResult<Synced<Landing>> {
        self.coordinator.create(fields)
    }

    pub fn update_landing(
        &self,
        id: &LandingId,
        patch: LandingPatch,
    ) -> CmsResult<Synced<Landing>> {
        self.coordinator.update(id, patch)
    }

    /// Delete a landing. The value is the former slug, or `None` if the
    /// landing was already gone.
    pub fn delete_landing(&self, id: &LandingId) -> CmsResult<Synced<Option<String>>> {
        self.coordinator.delete(id)
    }

    // ---- Menu ----

    pub fn get_menu(&self) -> CmsResult<Menu> {
        Ok(self.coordinator.menu().get()?)
    }

    pub fn replace_menu(&self, menu: Menu) -> CmsResult<Menu> {
        Ok(self.coordinator.menu().replace(menu)?)
    }

    // ---- Resources ----

    pub fn list_resources(&self) -> CmsResult<Vec<ResourceDescriptor>> {
        Ok(self.resources.list()?)
    }

    pub fn upsert_resource(&self, descriptor: ResourceDescriptor) -> CmsResult<ResourceDescriptor> {
        Ok(self.resources.upsert(descriptor)?)
    }

    /// Remove a resource. Landings keep any reference to its id.
    pub fn delete_resource(&self, id: &ResourceId) -> CmsResult<bool> {
        Ok(self.resources.delete(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use chrono::Duration;
    use lcms_menu::MenuNode;
    use lcms_types::{ManualClock, SequentialIds};

    use crate::coordinator::MenuSync;
    use crate::error::CmsError;

    fn cms() -> Cms {
        Cms::in_memory().with_ids(Arc::new(SequentialIds::new("id")))
    }

    #[test]
    fn created_landing_is_listed_exactly_once() {
        let cms = cms();
        let created = cms
            .create_landing("Seguro de Auto", "/seguros/auto", Some("Seguros".into()))
            .unwrap()
            .value;

        let listed = cms.list_landings().unwrap();
        let matching: Vec<_> = listed.iter().filter(|e| e.id == created.id).collect();
        assert_eq!(matching.len(), 1);
        assert!(matching[0].mirrors(&cms.get_landing(&created.id).unwrap()));
    }

    #[test]
    fn first_create_links_into_skeleton_menu() {
        let cms = cms();
        let created = cms
            .create_landing("Hogar", "/seguros/hogar", Some("Seguros".into()))
            .unwrap();
        assert_eq!(created.menu, MenuSync::Synced { nodes: 1 });

        let menu = cms.get_menu().unwrap();
        assert_eq!(menu.roots()[0].label, "Inicio");
        let seguros = menu.find_category("Seguros").unwrap();
        assert_eq!(seguros.items[0].href, "/seguros/hogar");
    }

    #[test]
    fn update_stamps_time_with_injected_clock() {
        let clock = Arc::new(ManualClock::new("2024-05-01T10:00:00Z".parse().unwrap()));
        let cms = cms().with_clock(clock.clone());
        let created = cms.create_landing("Auto", "/auto", None).unwrap().value;

        clock.advance(Duration::minutes(5));
        let updated = cms
            .update_landing(&created.id, LandingPatch::name("Auto Plus"))
            .unwrap()
            .value;
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.updated_at, created.created_at + Duration::minutes(5));
        assert!(cms.list_landings().unwrap()[0].mirrors(&updated));
    }

    #[test]
    fn delete_twice_succeeds() {
        let cms = cms();
        let created = cms.create_landing("Auto", "/auto", None).unwrap().value;
        assert_eq!(
            cms.delete_landing(&created.id).unwrap().value.as_deref(),
            Some("/auto")
        );
        assert_eq!(cms.delete_landing(&created.id).unwrap().value, None);
        assert!(cms.get_landing(&created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn replace_menu_validates() {
        let cms = cms();
        let err = cms
            .replace_menu(Menu::new(vec![MenuNode::landing("", "/x")]))
            .unwrap_err();
        assert!(matches!(err, CmsError::Menu(_)));
        assert_eq!(cms.get_menu().unwrap(), Menu::skeleton());
    }

    #[test]
    fn resources_round_trip_and_dangling_ids_are_kept() {
        let cms = cms();
        let guide = cms
            .upsert_resource(ResourceDescriptor::new("Guía", "/guia.pdf"))
            .unwrap();
        assert_eq!(cms.list_resources().unwrap(), vec![guide.clone()]);

        let landing = cms.create_landing("Auto", "/auto", None).unwrap().value;
        let mut content = landing.content.clone();
        content.resources.enabled_resource_ids.push(guide.id.clone());
        cms.update_landing(
            &landing.id,
            LandingPatch {
                content: Some(content),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(cms.delete_resource(&guide.id).unwrap());
        let stored = cms.get_landing(&landing.id).unwrap();
        assert_eq!(stored.content.resources.enabled_resource_ids, vec![guide.id]);
    }

    #[test]
    fn corrupted_index_is_a_hard_failure() {
        let cms = cms();
        cms.documents()
            .write(&cms.layout().landings.index, &serde_json::json!({ "oops": 1 }))
            .unwrap();
        let err = cms.list_landings().unwrap_err();
        assert!(err.is_corrupted());
        assert!(cms.create_landing("Auto", "/auto", None).unwrap_err().is_corrupted());
    }

    #[test]
    fn open_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let config = CmsConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let created = Cms::open(&config)
            .unwrap()
            .create_landing("Auto", "/seguros/auto", Some("Seguros".into()))
            .unwrap()
            .value;

        let reopened = Cms::open(&config).unwrap();
        assert_eq!(reopened.get_landing(&created.id).unwrap(), created);
        assert!(reopened.get_menu().unwrap().contains_href("/seguros/auto"));
        assert!(dir.path().join("landing-index.json").is_file());
        assert!(dir
            .path()
            .join(format!("landings/{}.json", created.id))
            .is_file());
    }

    #[test]
    fn concurrent_lifecycle_keeps_index_and_menu_in_step() {
        let dir = tempfile::tempdir().unwrap();
        let config = CmsConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let cms = Cms::open(&config).unwrap();

        thread::scope(|s| {
            for t in 0..4 {
                let cms = &cms;
                s.spawn(move || {
                    for i in 0..6 {
                        let slug = format!("/seguros/{t}-{i}");
                        let created = cms
                            .create_landing(format!("L{t}-{i}"), slug, Some("Seguros".into()))
                            .unwrap();
                        assert_eq!(created.menu, MenuSync::Synced { nodes: 1 });
                        if i % 2 == 0 {
                            cms.delete_landing(&created.value.id).unwrap();
                        }
                    }
                });
            }
        });

        let index = cms.list_landings().unwrap();
        assert_eq!(index.len(), 12);
        let menu = cms.get_menu().unwrap();
        let linked = &menu.find_category("Seguros").unwrap().items;
        assert_eq!(linked.len(), 12);
        for entry in &index {
            assert!(menu.contains_href(&entry.slug));
        }
    }
}
