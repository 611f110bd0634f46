//! Foundation types for the landing CMS.
//!
//! Every other `lcms-*` crate depends on this one. It holds the identifier
//! newtypes shared across stores and the two collaborators the core consumes
//! from its environment: a clock and an id source. Both are traits so tests
//! can pin time and ids.
//!
//! # Key Types
//!
//! - [`LandingId`] / [`ResourceId`] -- opaque, store-key-safe identifiers
//! - [`Timestamp`] -- UTC wall-clock time, RFC 3339 on the wire
//! - [`Clock`] -- [`SystemClock`], [`ManualClock`]
//! - [`IdGenerator`] -- [`UuidV7Ids`], [`SequentialIds`]

pub mod clock;
pub mod error;
pub mod id;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use error::TypeError;
pub use id::{IdGenerator, LandingId, ResourceId, SequentialIds, UuidV7Ids};
