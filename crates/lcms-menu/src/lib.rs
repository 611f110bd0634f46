//! Navigation menu for the landing CMS.
//!
//! The menu is one document holding an ordered forest of [`MenuNode`]s.
//! Nodes are tagged as `category` (a grouping container), `link` (a
//! free-standing URL) or `landing` (points at a landing by slug through its
//! `href`).
//!
//! - [`Menu`] -- the forest and its pure, in-memory traversals
//! - [`MenuTree`] -- the stored menu; every mutation is a locked
//!   read-modify-write of the whole document

pub mod error;
pub mod node;
pub mod tree;

pub use error::{MenuError, MenuResult};
pub use node::{Menu, MenuNode, NodeKind};
pub use tree::MenuTree;
