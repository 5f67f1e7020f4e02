//! SourceId value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a knowledge source (Value Object)
///
/// Always lowercase and restricted to `[a-z0-9._-]`, so it can be matched
/// case-insensitively against free model output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(String);

impl SourceId {
    /// Create a new id, normalizing to lowercase.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = id.as_ref().trim();
        if !Self::is_valid(raw) {
            return Err(DomainError::InvalidSourceId(raw.to_string()));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Id from a compile-time literal that is already lowercase and valid.
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(Self::is_valid(id) && id == id.to_ascii_lowercase());
        Self(id.to_string())
    }

    /// Whether `s` has the shape of a source identifier.
    pub fn is_valid(s: &str) -> bool {
        !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SourceId::new(&s).map_err(serde::de::Error::custom)
    }
}
