//! Document key validation.
//!
//! A key is a `/`-separated logical name such as `landing-index` or
//! `landings/0190a6c2-...`. Valid keys:
//! - Must be non-empty
//! - Must not contain whitespace, control characters, `\`, `:`, `*`, `?`
//! - Must not start or end with `/`, or contain `//`
//! - Must not contain a `.` or `..` component, or a component starting with `.`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Characters that are forbidden anywhere in a key.
const FORBIDDEN_CHARS: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|'];

/// The logical name of a stored document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Validate and wrap a key.
    pub fn new(raw: impl Into<String>) -> StoreResult<Self> {
        let raw = raw.into();
        validate_key(&raw)?;
        Ok(Self(raw))
    }

    /// Build a key from a prefix and a single child segment.
    pub fn child(&self, segment: &str) -> StoreResult<Self> {
        Self::new(format!("{}/{segment}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `/`-separated components of the key.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentKey {
    type Error = StoreError;

    fn try_from(raw: String) -> StoreResult<Self> {
        Self::new(raw)
    }
}

impl From<DocumentKey> for String {
    fn from(key: DocumentKey) -> Self {
        key.0
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidKey {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(invalid(key, "key must not be empty"));
    }

    if let Some(ch) = key
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(c))
    {
        return Err(invalid(key, format!("contains forbidden character: {ch:?}")));
    }

    if key.starts_with('/') || key.ends_with('/') {
        return Err(invalid(key, "must not start or end with '/'"));
    }

    for segment in key.split('/') {
        if segment.is_empty() {
            return Err(invalid(key, "must not contain empty components"));
        }
        if segment.starts_with('.') {
            return Err(invalid(key, "components must not start with '.'"));
        }
    }

    Ok(())
}
