//! Sequencing of landing writes and the menu edits that follow them.
//!
//! Every landing lifecycle event runs in two steps: the landing repository
//! write, which must succeed or the whole operation fails, then the menu
//! edit. A failed menu edit is reported in the result as
//! [`MenuSync::Failed`] and logged; the landing write is kept.

use serde::Serialize;
use tracing::{debug, warn};

use lcms_landing::{Landing, LandingPatch, LandingRepository, NewLanding, UpdatedLanding};
use lcms_menu::{MenuNode, MenuResult, MenuTree};
use lcms_types::LandingId;

use crate::error::CmsResult;

/// What happened to the menu after a landing write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MenuSync {
    /// The menu edit ran; `nodes` menu nodes were inserted, relabelled or
    /// removed.
    Synced { nodes: usize },
    /// There was nothing to link or clean up.
    Skipped,
    /// The menu edit failed. Menu linkage for this landing may be stale.
    Failed { reason: String },
}

impl MenuSync {
    pub fn is_failed(&self) -> bool {
        matches!(self, MenuSync::Failed { .. })
    }
}

/// A completed landing operation together with its menu outcome.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Synced<T> {
    pub value: T,
    pub menu: MenuSync,
}

/// Runs landing create, update and delete across the repository and menu.
#[derive(Debug)]
pub struct Coordinator {
    landings: LandingRepository,
    menu: MenuTree,
}

impl Coordinator {
    pub fn new(landings: LandingRepository, menu: MenuTree) -> Self {
        Self { landings, menu }
    }

    pub fn landings(&self) -> &LandingRepository {
        &self.landings
    }

    pub fn menu(&self) -> &MenuTree {
        &self.menu
    }

    /// Create the landing, then link it under its menu category if it has one.
    pub fn create(&self, fields: NewLanding) -> CmsResult<Synced<Landing>> {
        let landing = self.landings.create(fields)?;

        let menu = if landing.menu_category.is_empty() {
            MenuSync::Skipped
        } else {
            let node = MenuNode::landing(landing.name.clone(), landing.slug.clone());
            let result = self
                .menu
                .insert_under_category(&landing.menu_category, node)
                .map(usize::from);
            report(&landing.id, "link", result)
        };

        Ok(Synced { value: landing, menu })
    }

    /// Update the landing, then bring its menu nodes in line with the new
    /// slug and name.
    pub fn update(&self, id: &LandingId, patch: LandingPatch) -> CmsResult<Synced<Landing>> {
        let updated = self.landings.update(id, patch)?;
        let menu = report(id, "relabel", self.follow(&updated));

        Ok(Synced {
            value: updated.landing,
            menu,
        })
    }

    fn follow(&self, updated: &UpdatedLanding) -> MenuResult<usize> {
        let landing = &updated.landing;
        if updated.slug_changed() {
            self.menu
                .retarget_href(&updated.previous_slug, &landing.slug)?;
        }
        self.menu.relabel_by_href(&landing.slug, &landing.name)
    }

    /// Delete the landing, then drop every menu node that pointed at it.
    ///
    /// Deleting an absent landing succeeds with `None` and leaves the menu
    /// alone.
    pub fn delete(&self, id: &LandingId) -> CmsResult<Synced<Option<String>>> {
        let slug = self.landings.delete(id)?;

        let menu = match &slug {
            Some(slug) => report(id, "unlink", self.menu.remove_by_href(slug)),
            None => MenuSync::Skipped,
        };

        Ok(Synced { value: slug, menu })
    }
}

fn report(id: &LandingId, step: &'static str, result: MenuResult<usize>) -> MenuSync {
    match result {
        Ok(nodes) => {
            debug!(%id, step, nodes, "menu synced");
            MenuSync::Synced { nodes }
        }
        Err(e) => {
            warn!(%id, step, error = %e, "menu sync failed, landing write kept");
            MenuSync::Failed {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lcms_landing::{LandingError, LandingKeys};
    use lcms_menu::{Menu, NodeKind};
    use lcms_store::{DocumentBackend, DocumentKey, Documents, InMemoryBackend};
    use lcms_types::{ManualClock, SequentialIds};

    use crate::error::CmsError;

    fn menu_key() -> DocumentKey {
        DocumentKey::new("menu").unwrap()
    }

    fn coordinator_over(docs: Documents) -> Coordinator {
        let landings = LandingRepository::new(
            docs.clone(),
            LandingKeys::default(),
            Arc::new(ManualClock::new("2024-05-01T10:00:00Z".parse().unwrap())),
            Arc::new(SequentialIds::new("landing")),
        );
        Coordinator::new(landings, MenuTree::new(docs, menu_key()))
    }

    fn seguros_only() -> Coordinator {
        let c = coordinator_over(Documents::in_memory());
        c.menu()
            .replace(Menu::new(vec![MenuNode::category("Seguros")]))
            .unwrap();
        c
    }

    fn auto() -> NewLanding {
        NewLanding::new("Seguro de Auto", "/seguros/auto").with_menu_category("Seguros")
    }

    #[test]
    fn create_links_under_category() {
        let c = seguros_only();
        let created = c.create(auto()).unwrap();
        assert_eq!(created.menu, MenuSync::Synced { nodes: 1 });

        let index = c.landings().get_all().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].slug, "/seguros/auto");

        let menu = c.menu().get().unwrap();
        let items = &menu.roots()[0].items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Seguro de Auto");
        assert_eq!(items[0].href, "/seguros/auto");
        assert_eq!(items[0].kind, NodeKind::Landing);
    }

    #[test]
    fn delete_unlinks_and_empties_category() {
        let c = seguros_only();
        let created = c.create(auto()).unwrap().value;

        let deleted = c.delete(&created.id).unwrap();
        assert_eq!(deleted.value.as_deref(), Some("/seguros/auto"));
        assert_eq!(deleted.menu, MenuSync::Synced { nodes: 1 });

        assert!(c.landings().get_all().unwrap().is_empty());
        let menu = c.menu().get().unwrap();
        assert!(menu.roots()[0].items.is_empty());
    }

    #[test]
    fn create_without_category_skips_menu() {
        let c = seguros_only();
        let before = c.menu().get().unwrap();
        let created = c.create(NewLanding::new("Viaje", "/viaje")).unwrap();
        assert_eq!(created.menu, MenuSync::Skipped);
        assert_eq!(c.menu().get().unwrap(), before);
    }

    #[test]
    fn create_with_unknown_category_leaves_menu_unchanged() {
        let c = seguros_only();
        let before = c.menu().get().unwrap();
        let created = c
            .create(NewLanding::new("Viaje", "/viaje").with_menu_category("Viajes"))
            .unwrap();
        assert_eq!(created.menu, MenuSync::Synced { nodes: 0 });
        assert_eq!(c.menu().get().unwrap(), before);
    }

    #[test]
    fn rejected_create_touches_nothing() {
        let c = seguros_only();
        c.create(auto()).unwrap();
        let menu_before = c.menu().get().unwrap();

        let err = c.create(auto()).unwrap_err();
        assert!(matches!(err, CmsError::Landing(LandingError::DuplicateSlug { .. })));
        assert_eq!(c.landings().get_all().unwrap().len(), 1);
        assert_eq!(c.menu().get().unwrap(), menu_before);
    }

    #[test]
    fn rename_relabels_every_matching_node() {
        let c = seguros_only();
        let landing = c.create(auto()).unwrap().value;
        // A second placement of the same landing elsewhere in the menu.
        c.menu()
            .insert_under_category("Seguros", MenuNode::link("Auto (destacado)", "/seguros/auto"))
            .unwrap();

        let updated = c.update(&landing.id, LandingPatch::name("Auto Total")).unwrap();
        assert_eq!(updated.menu, MenuSync::Synced { nodes: 2 });

        let menu = c.menu().get().unwrap();
        for node in menu.nodes().into_iter().filter(|n| n.href == "/seguros/auto") {
            assert_eq!(node.label, "Auto Total");
        }
    }

    #[test]
    fn slug_change_retargets_menu_nodes() {
        let c = seguros_only();
        let landing = c.create(auto()).unwrap().value;

        let updated = c
            .update(&landing.id, LandingPatch::slug("/seguros/coche"))
            .unwrap();
        assert_eq!(updated.value.slug, "/seguros/coche");
        assert_eq!(updated.menu, MenuSync::Synced { nodes: 1 });

        let menu = c.menu().get().unwrap();
        assert!(!menu.contains_href("/seguros/auto"));
        assert!(menu.contains_href("/seguros/coche"));

        c.delete(&landing.id).unwrap();
        assert!(!c.menu().get().unwrap().contains_href("/seguros/coche"));
    }

    #[test]
    fn second_delete_is_a_quiet_no_op() {
        let c = seguros_only();
        let landing = c.create(auto()).unwrap().value;

        c.delete(&landing.id).unwrap();
        let again = c.delete(&landing.id).unwrap();
        assert_eq!(again.value, None);
        assert_eq!(again.menu, MenuSync::Skipped);
    }

    #[test]
    fn menu_failure_keeps_the_landing() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.save(&menu_key(), b"{ broken").unwrap();
        let c = coordinator_over(Documents::new(backend));

        let created = c.create(auto()).unwrap();
        assert!(created.menu.is_failed());
        assert!(c.landings().get_by_id(&created.value.id).is_ok());

        let updated = c
            .update(&created.value.id, LandingPatch::name("Otro"))
            .unwrap();
        assert!(updated.menu.is_failed());
        assert_eq!(c.landings().get_by_id(&created.value.id).unwrap().name, "Otro");

        let deleted = c.delete(&created.value.id).unwrap();
        assert!(deleted.menu.is_failed());
        assert!(c.landings().get_all().unwrap().is_empty());
    }

    #[test]
    fn update_of_missing_landing_fails_without_menu_step() {
        let c = seguros_only();
        let err = c
            .update(&LandingId::parse("ghost").unwrap(), LandingPatch::name("X"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn menu_sync_serializes_with_status_tag() {
        let json = serde_json::to_value(MenuSync::Synced { nodes: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "synced", "nodes": 2 }));
        let json = serde_json::to_value(MenuSync::Skipped).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "skipped" }));
    }
}
