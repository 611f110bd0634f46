//! The stored navigation menu.

use lcms_store::{DocumentKey, Documents};
use tracing::{debug, info};

use crate::error::{MenuError, MenuResult};
use crate::node::{Menu, MenuNode};

/// The menu document and the edits landing operations make to it.
///
/// Every mutation loads the whole document, changes it in memory and writes
/// it back while holding the document's key lock. A missing document reads
/// as [`Menu::skeleton`]; a mutation on a missing document persists the
/// skeleton with the change applied.
#[derive(Clone, Debug)]
pub struct MenuTree {
    docs: Documents,
    key: DocumentKey,
}

impl MenuTree {
    pub fn new(docs: Documents, key: DocumentKey) -> Self {
        Self { docs, key }
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    /// The stored menu, or the skeleton if none has been written yet.
    pub fn get(&self) -> MenuResult<Menu> {
        Ok(self.docs.read_or(&self.key, Menu::skeleton)?)
    }

    /// Replace the whole menu. Nothing is written if `menu` is malformed.
    pub fn replace(&self, menu: Menu) -> MenuResult<Menu> {
        menu.validate()?;
        self.docs.write(&self.key, &menu)?;
        info!(roots = menu.roots().len(), "menu replaced");
        Ok(menu)
    }

    /// Append `node` under the first category labelled `category`.
    ///
    /// Returns `false` if there is no such category; the menu is then left
    /// exactly as it was.
    pub fn insert_under_category(&self, category: &str, node: MenuNode) -> MenuResult<bool> {
        let href = node.href.clone();
        let inserted = self.mutate(|menu| menu.insert_under_category(category, node))?;
        if inserted {
            debug!(category, %href, "menu node inserted");
        } else {
            debug!(category, %href, "no such menu category, node not inserted");
        }
        Ok(inserted)
    }

    /// Set the label of every link or landing node pointing at `href`.
    pub fn relabel_by_href(&self, href: &str, label: &str) -> MenuResult<usize> {
        let count = self.mutate(|menu| menu.relabel_by_href(href, label))?;
        debug!(href, label, count, "menu nodes relabelled");
        Ok(count)
    }

    /// Point every link or landing node at `from` to `to` instead.
    pub fn retarget_href(&self, from: &str, to: &str) -> MenuResult<usize> {
        let count = self.mutate(|menu| menu.retarget_href(from, to))?;
        debug!(from, to, count, "menu nodes retargeted");
        Ok(count)
    }

    /// Remove every link or landing node pointing at `href`, with its subtree.
    pub fn remove_by_href(&self, href: &str) -> MenuResult<usize> {
        let count = self.mutate(|menu| menu.remove_by_href(href))?;
        debug!(href, count, "menu nodes removed");
        Ok(count)
    }

    /// Locked read-modify-write over the menu document.
    ///
    /// When the edit reports no change (`false` or `0`) the document is not
    /// rewritten.
    fn mutate<R: Changed>(&self, edit: impl FnOnce(&mut Menu) -> R) -> MenuResult<R> {
        let result = self.docs.update_if(&self.key, Menu::skeleton, |menu: &mut Menu| {
            let out = edit(menu);
            let changed = out.changed();
            Ok::<_, MenuError>((out, changed))
        })?;
        Ok(result)
    }
}

/// Whether an in-memory edit changed the menu.
trait Changed {
    fn changed(&self) -> bool;
}

impl Changed for bool {
    fn changed(&self) -> bool {
        *self
    }
}

impl Changed for usize {
    fn changed(&self) -> bool {
        *self > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use lcms_store::{DocumentBackend, InMemoryBackend};

    use crate::node::NodeKind;

    fn key() -> DocumentKey {
        DocumentKey::new("menu").unwrap()
    }

    fn tree() -> MenuTree {
        MenuTree::new(Documents::in_memory(), key())
    }

    #[test]
    fn missing_document_reads_as_skeleton() {
        let menu = tree().get().unwrap();
        assert_eq!(menu, Menu::skeleton());
        assert_eq!(menu.roots()[0].href, "/");
        assert!(menu.find_category("Seguros").is_some());
    }

    #[test]
    fn replace_round_trips_and_rejects_malformed() {
        let tree = tree();
        let menu = Menu::new(vec![MenuNode::link("Blog", "/blog")]);
        tree.replace(menu.clone()).unwrap();
        assert_eq!(tree.get().unwrap(), menu);

        let bad = Menu::new(vec![MenuNode::landing("Auto", "")]);
        assert!(matches!(tree.replace(bad), Err(MenuError::Invalid { .. })));
        assert_eq!(tree.get().unwrap(), menu);
    }

    #[test]
    fn create_then_delete_scenario() {
        let tree = tree();
        tree.replace(Menu::new(vec![MenuNode::category("Seguros")]))
            .unwrap();

        let inserted = tree
            .insert_under_category("Seguros", MenuNode::landing("Seguro de Auto", "/seguros/auto"))
            .unwrap();
        assert!(inserted);

        let menu = tree.get().unwrap();
        let child = &menu.roots()[0].items[0];
        assert_eq!(child.kind, NodeKind::Landing);
        assert_eq!(child.label, "Seguro de Auto");
        assert_eq!(child.href, "/seguros/auto");

        assert_eq!(tree.remove_by_href("/seguros/auto").unwrap(), 1);
        let menu = tree.get().unwrap();
        assert!(menu.roots()[0].items.is_empty());
        assert!(!menu.contains_href("/seguros/auto"));
    }

    #[test]
    fn insert_into_missing_category_writes_nothing() {
        let backend = Arc::new(InMemoryBackend::new());
        let tree = MenuTree::new(Documents::new(backend.clone()), key());
        tree.replace(Menu::new(vec![MenuNode::category("Seguros")]))
            .unwrap();
        let before = backend.load(&key()).unwrap();

        let inserted = tree
            .insert_under_category("Viajes", MenuNode::landing("Viaje", "/viajes"))
            .unwrap();
        assert!(!inserted);
        assert_eq!(backend.load(&key()).unwrap(), before);
    }

    #[test]
    fn no_op_edit_on_missing_document_does_not_create_it() {
        let docs = Documents::in_memory();
        let tree = MenuTree::new(docs.clone(), key());
        assert_eq!(tree.remove_by_href("/nada").unwrap(), 0);
        assert!(!docs.exists(&key()).unwrap());
    }

    #[test]
    fn edit_on_missing_document_persists_skeleton() {
        let docs = Documents::in_memory();
        let tree = MenuTree::new(docs.clone(), key());
        assert!(tree
            .insert_under_category("Seguros", MenuNode::landing("Hogar", "/seguros/hogar"))
            .unwrap());

        let stored: Menu = docs.read(&key()).unwrap().unwrap();
        assert_eq!(stored.roots()[0].label, "Inicio");
        assert!(stored.contains_href("/seguros/hogar"));
    }

    #[test]
    fn relabel_and_retarget() {
        let tree = tree();
        tree.insert_under_category("Seguros", MenuNode::landing("Auto", "/seguros/auto"))
            .unwrap();

        assert_eq!(tree.retarget_href("/seguros/auto", "/seguros/coche").unwrap(), 1);
        assert_eq!(tree.relabel_by_href("/seguros/coche", "Coche").unwrap(), 1);

        let menu = tree.get().unwrap();
        assert!(!menu.contains_href("/seguros/auto"));
        let node = &menu.find_category("Seguros").unwrap().items[0];
        assert_eq!((node.label.as_str(), node.href.as_str()), ("Coche", "/seguros/coche"));
    }

    #[test]
    fn corrupted_menu_fails_every_mutation() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.save(&key(), b"{\"menu\": true}").unwrap();
        let tree = MenuTree::new(Documents::new(backend), key());

        assert!(matches!(tree.get(), Err(MenuError::Store(_))));
        assert!(tree.remove_by_href("/x").is_err());
        assert!(tree
            .insert_under_category("Seguros", MenuNode::landing("X", "/x"))
            .is_err());
    }

    #[test]
    fn concurrent_inserts_lose_nothing() {
        let tree = tree();
        thread::scope(|s| {
            for t in 0..6 {
                let tree = tree.clone();
                s.spawn(move || {
                    for i in 0..5 {
                        let slug = format!("/seguros/{t}-{i}");
                        assert!(tree
                            .insert_under_category("Seguros", MenuNode::landing("L", slug))
                            .unwrap());
                    }
                });
            }
        });

        let menu = tree.get().unwrap();
        assert_eq!(menu.find_category("Seguros").unwrap().items.len(), 30);
    }
}
