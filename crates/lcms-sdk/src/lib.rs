//! High-level API for the landing CMS.
//!
//! [`Cms`] is the entry point for applications embedding the CMS. It exposes
//! the landing, menu and resource operations over one document store and
//! routes landing lifecycle events through the [`Coordinator`], which keeps
//! the listing index and the navigation menu following the canonical landing
//! documents.

pub mod cms;
pub mod config;
pub mod coordinator;
pub mod error;

pub use cms::Cms;
pub use config::{CmsConfig, DocumentLayout, DocumentNames};
pub use coordinator::{Coordinator, MenuSync, Synced};
pub use error::{CmsError, CmsResult};

// Re-export the types callers pass through the API
pub use lcms_landing::{Landing, LandingContent, LandingIndexEntry, LandingPatch, NewLanding};
pub use lcms_menu::{Menu, MenuNode, NodeKind};
pub use lcms_resources::ResourceDescriptor;
pub use lcms_types::{Clock, IdGenerator, LandingId, ResourceId};
