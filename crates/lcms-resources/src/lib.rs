//! Resource library for the landing CMS.
//!
//! A flat, ordered collection of [`ResourceDescriptor`]s stored as one array
//! document. Landings refer to resources by id only; nothing here checks or
//! cleans up those references.

pub mod error;
pub mod library;

pub use error::{ResourceError, ResourceResult};
pub use library::{ResourceDescriptor, ResourceLibrary};
