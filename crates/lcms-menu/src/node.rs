//! Menu node types and forest traversals.
//!
//! All traversals are depth-first in document order: a node is visited
//! before its children, and a node's whole subtree before its next sibling.
//!
//! The href-keyed operations (relabel, retarget, remove) match link and
//! landing nodes only. Categories are grouping containers whose href is not a
//! landing join key, so a landing operation never relabels or drops one.

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, MenuResult};

/// What a menu node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Pure grouping container. Never removed by landing operations.
    Category,
    /// Free-standing link managed by an administrator.
    Link,
    /// Link to a landing; `href` is the landing's slug.
    Landing,
}

/// One entry of the navigation menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub label: String,
    #[serde(default)]
    pub href: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub items: Vec<MenuNode>,
}

impl MenuNode {
    pub fn category(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: String::new(),
            kind: NodeKind::Category,
            items: Vec::new(),
        }
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            kind: NodeKind::Link,
            items: Vec::new(),
        }
    }

    /// A node pointing at the landing with the given slug.
    pub fn landing(label: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: slug.into(),
            kind: NodeKind::Landing,
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<MenuNode>) -> Self {
        self.items = items;
        self
    }

    pub fn is_category(&self) -> bool {
        self.kind == NodeKind::Category
    }

    /// Returns `true` if this node is a link or landing pointing at `href`.
    pub fn matches_href(&self, href: &str) -> bool {
        !self.is_category() && self.href == href
    }
}

/// The whole menu: an ordered forest of root nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu(pub Vec<MenuNode>);

impl Menu {
    pub fn new(roots: Vec<MenuNode>) -> Self {
        Self(roots)
    }

    /// The menu synthesized when no menu document exists yet.
    pub fn skeleton() -> Self {
        Self(vec![
            MenuNode::link("Inicio", "/"),
            MenuNode::category("Seguros"),
        ])
    }

    pub fn roots(&self) -> &[MenuNode] {
        &self.0
    }

    pub fn into_roots(self) -> Vec<MenuNode> {
        self.0
    }

    /// Every node in depth-first order.
    pub fn nodes(&self) -> Vec<&MenuNode> {
        fn walk<'a>(nodes: &'a [MenuNode], out: &mut Vec<&'a MenuNode>) {
            for node in nodes {
                out.push(node);
                walk(&node.items, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.0, &mut out);
        out
    }

    /// Returns `true` if any link or landing node at any depth has this href.
    pub fn contains_href(&self, href: &str) -> bool {
        self.nodes().iter().any(|n| n.matches_href(href))
    }

    /// The first category (depth-first) with exactly this label.
    pub fn find_category(&self, label: &str) -> Option<&MenuNode> {
        self.nodes()
            .into_iter()
            .find(|n| n.is_category() && n.label == label)
    }

    fn find_category_mut<'a>(nodes: &'a mut [MenuNode], label: &str) -> Option<&'a mut MenuNode> {
        for node in nodes.iter_mut() {
            if node.is_category() && node.label == label {
                return Some(node);
            }
            if let Some(found) = Self::find_category_mut(&mut node.items, label) {
                return Some(found);
            }
        }
        None
    }

    /// Append `node` to the first category labelled `category`.
    ///
    /// Returns `false` and leaves the menu untouched if no such category
    /// exists. The node is never placed at the root instead.
    pub fn insert_under_category(&mut self, category: &str, node: MenuNode) -> bool {
        match Self::find_category_mut(&mut self.0, category) {
            Some(parent) => {
                parent.items.push(node);
                true
            }
            None => false,
        }
    }

    /// Set the label of every link or landing node whose href matches. Returns the number of
    /// nodes relabelled.
    pub fn relabel_by_href(&mut self, href: &str, label: &str) -> usize {
        fn walk(nodes: &mut [MenuNode], href: &str, label: &str) -> usize {
            let mut count = 0;
            for node in nodes {
                if node.matches_href(href) {
                    node.label = label.to_string();
                    count += 1;
                }
                count += walk(&mut node.items, href, label);
            }
            count
        }
        walk(&mut self.0, href, label)
    }

    /// Point every node with href `from` at `to`. Returns the number changed.
    pub fn retarget_href(&mut self, from: &str, to: &str) -> usize {
        fn walk(nodes: &mut [MenuNode], from: &str, to: &str) -> usize {
            let mut count = 0;
            for node in nodes {
                if node.matches_href(from) {
                    node.href = to.to_string();
                    count += 1;
                }
                count += walk(&mut node.items, from, to);
            }
            count
        }
        walk(&mut self.0, from, to)
    }

    /// Remove every link or landing node whose href matches, at any depth, with its
    /// subtree. Returns the number of matching nodes removed; descendants that
    /// went with them are not counted.
    pub fn remove_by_href(&mut self, href: &str) -> usize {
        fn walk(nodes: &mut Vec<MenuNode>, href: &str) -> usize {
            let before = nodes.len();
            nodes.retain(|n| !n.matches_href(href));
            let mut count = before - nodes.len();
            for node in nodes.iter_mut() {
                count += walk(&mut node.items, href);
            }
            count
        }
        walk(&mut self.0, href)
    }

    /// Check that every node is well formed: labels are non-empty, and link
    /// and landing nodes carry an href.
    pub fn validate(&self) -> MenuResult<()> {
        fn walk(nodes: &[MenuNode], prefix: &str) -> MenuResult<()> {
            for (i, node) in nodes.iter().enumerate() {
                let path = format!("{prefix}[{i}]");
                if node.label.trim().is_empty() {
                    return Err(MenuError::Invalid {
                        path,
                        reason: "label must not be empty".into(),
                    });
                }
                if !node.is_category() && node.href.trim().is_empty() {
                    return Err(MenuError::Invalid {
                        path,
                        reason: format!("{:?} node needs an href", node.kind),
                    });
                }
                walk(&node.items, &format!("{path}.items"))?;
            }
            Ok(())
        }
        walk(&self.0, "menu")
    }
}

impl From<Vec<MenuNode>> for Menu {
    fn from(roots: Vec<MenuNode>) -> Self {
        Self(roots)
    }
}
