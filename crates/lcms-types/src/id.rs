use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Check that `raw` can be used verbatim as one segment of a store key.
fn validate_id(raw: &str) -> Result<(), TypeError> {
    if raw.is_empty() {
        return Err(TypeError::EmptyId);
    }
    if let Some(bad) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(TypeError::InvalidId {
            id: raw.to_string(),
            reason: format!("unexpected character {bad:?}"),
        });
    }
    Ok(())
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse a caller-supplied identifier.
            pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
                let raw = raw.into();
                validate_id(&raw)?;
                Ok(Self(raw))
            }

            /// Generate a fresh identifier from the given source.
            pub fn generate(ids: &dyn IdGenerator) -> Self {
                Self(ids.next_id())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the identifier is safe to use as a store key segment.
            pub fn is_valid(&self) -> bool {
                validate_id(&self.0).is_ok()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id! {
    /// Stable identifier of a landing. Generated once on create and never changed.
    LandingId
}

opaque_id! {
    /// Identifier of a resource descriptor in the shared library.
    ResourceId
}

/// Source of globally unique, opaque identifier strings.
///
/// Implementations must only produce ids made of ASCII alphanumerics, `-`
/// and `_`, so that ids can be embedded in store keys.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Time-ordered UUID v7 ids, the production id source.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidV7Ids;

impl IdGenerator for UuidV7Ids {
    fn next_id(&self) -> String {
        uuid::Uuid::now_v7().to_string()
    }
}

/// Deterministic `prefix-N` ids for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_uuid_like_ids() {
        let id = LandingId::parse("0190a6c2-7b1e-7c3a-9f00-1234abcd5678").unwrap();
        assert_eq!(id.as_str(), "0190a6c2-7b1e-7c3a-9f00-1234abcd5678");
        assert!(id.is_valid());
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(LandingId::parse(""), Err(TypeError::EmptyId));
    }

    #[test]
    fn parse_rejects_path_characters() {
        let err = ResourceId::parse("../etc").unwrap_err();
        assert!(matches!(err, TypeError::InvalidId { .. }));
        assert!(ResourceId::parse("a/b").is_err());
    }

    #[test]
    fn uuid_ids_are_unique_and_valid() {
        let ids = UuidV7Ids;
        let a = LandingId::generate(&ids);
        let b = LandingId::generate(&ids);
        assert_ne!(a, b);
        assert!(a.is_valid());
        assert!(b.is_valid());
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::new("landing");
        assert_eq!(ids.next_id(), "landing-1");
        assert_eq!(ids.next_id(), "landing-2");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ResourceId::parse("res-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"res-1\"");
        let back: ResourceId = serde_json::from_str("\"res-1\"").unwrap();
        assert_eq!(back, id);
    }
}
