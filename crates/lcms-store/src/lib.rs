//! JSON document storage for the landing CMS.
//!
//! Every persisted fact lives in a single JSON document addressed by a
//! [`DocumentKey`]: one document per landing, plus the shared landing index,
//! the menu forest and the resource collection. This crate is the only place
//! that touches the underlying storage.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentBackend`] trait and deal in raw bytes:
//!
//! - [`FsBackend`] -- one `<key>.json` file per document, replaced atomically
//! - [`InMemoryBackend`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A read of a missing document yields the caller's default, never an error.
//! 2. A document that fails to parse is reported as [`StoreError::Corrupted`],
//!    never treated as empty.
//! 3. Writes replace the whole document. There is no patch write.
//! 4. Every read-modify-write goes through [`Documents::update`], which holds
//!    the per-key lock for the full read → mutate → write sequence.
//! 5. Nested critical sections only ever go from a shared document (index,
//!    menu) to a per-landing document, never the other way round.

pub mod documents;
pub mod error;
pub mod fs;
pub mod key;
pub mod locks;
pub mod memory;
pub mod traits;

pub use documents::Documents;
pub use error::{StoreError, StoreResult};
pub use fs::FsBackend;
pub use key::DocumentKey;
pub use locks::KeyLocks;
pub use memory::InMemoryBackend;
pub use traits::DocumentBackend;
