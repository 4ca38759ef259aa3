//! Lookup key normalization

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical lookup key: lower-cased, with every space character removed.
///
/// Only U+0020 is stripped; tabs and other whitespace are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

/// Identity of an authenticated author
pub type Identity = NormalizedKey;

pub fn normalize(s: &str) -> NormalizedKey {
    NormalizedKey(s.replace(' ', "").to_lowercase())
}

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NormalizedKey {
    fn from(s: &str) -> Self {
        normalize(s)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
