//! Bundle ids: the reverse-domain identifiers naming each app directory.

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;

use crate::pattern::is_bundle_id;

/// A validated reverse-domain app identifier, also the app's directory name.
///
/// # Example
///
/// ```
/// use apphub_schema::BundleId;
///
/// let id = BundleId::new("io.example.app").unwrap();
/// assert_eq!(id.as_str(), "io.example.app");
/// assert!(BundleId::new("Foo").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BundleId(String);

/// Returned when a string is not a valid bundle id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid app bundle id: {0}")]
pub struct InvalidBundleId(pub String);

impl BundleId {
    /// Validate `s` against the bundle-id pattern.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBundleId`] if `s` is not a reverse-domain id made of
    /// lowercase alphanumeric and hyphen labels.
    pub fn new(s: &str) -> Result<Self, InvalidBundleId> {
        if is_bundle_id(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidBundleId(s.to_string()))
        }
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BundleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BundleId {
    type Err = InvalidBundleId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BundleId {
    type Error = InvalidBundleId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl<'de> Deserialize<'de> for BundleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for BundleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for BundleId {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl Borrow<str> for BundleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BundleId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BundleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
