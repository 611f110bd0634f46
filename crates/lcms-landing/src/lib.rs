//! Landing repository for the landing CMS.
//!
//! A landing is stored twice: once as its canonical document
//! (`landings/<id>`), and once as a summary row in the shared listing index
//! (`landing-index`). The [`LandingRepository`] keeps the two in step:
//!
//! - every landing that exists has exactly one index entry with the same id,
//! - the mirrored fields of that entry equal the canonical document as of the
//!   last completed write,
//! - slugs are unique across the index (exact, case-sensitive match),
//! - ids never change once generated.
//!
//! Index membership is keyed by id, so a slug may change on update without
//! breaking the join.

pub mod error;
pub mod model;
pub mod repository;

pub use error::{LandingError, LandingResult};
pub use model::{
    Landing, LandingContent, LandingIndexEntry, LandingPatch, NewLanding, ResourceSelection,
};
pub use repository::{LandingKeys, LandingRepository, UpdatedLanding};
