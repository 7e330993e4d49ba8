//! Stash names.

use crate::error::{Error, Result};
use crate::key::LocationKey;
use regex::Regex;
use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9_-]+$").expect("valid stash name pattern"));

/// Check a name against the allowed character set.
///
/// Only ASCII letters, digits, `-` and `_` are allowed, and the name must
/// not be empty.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// A normalized stash name: lower-cased and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StashName(String);

impl StashName {
    /// Normalize without validating the character set.
    ///
    /// Used for lookups, where a bad name simply fails to resolve.
    pub fn normalize(raw: &str) -> Self {
        StashName(raw.to_lowercase().trim().to_string())
    }

    /// Normalize and validate.
    pub fn parse(raw: &str) -> Result<Self> {
        let name = Self::normalize(raw);
        if !name.is_valid() {
            return Err(Error::invalid_name(name.0));
        }
        Ok(name)
    }

    /// Whether this name passes the character-set check.
    pub fn is_valid(&self) -> bool {
        is_valid_name(&self.0)
    }

    /// Whether the name is exactly one plain path component, so joining
    /// it onto a directory stays inside that directory.
    ///
    /// Every valid name is a single segment; lookups with unvalidated
    /// names rely on this check instead.
    pub fn is_single_segment(&self) -> bool {
        let mut components = Path::new(&self.0).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The shard key for this name.
    pub fn location_key(&self) -> LocationKey {
        LocationKey::compute(&self.0)
    }
}

impl AsRef<str> for StashName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StashName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StashName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
