//! Content-derived deduplication identity for events.

use sha2::{Digest, Sha256};
use std::{collections::BTreeMap, fmt};

/// Keys whose values legitimately differ between otherwise identical events.
pub const VOLATILE_KEYS: [&str; 1] = ["time.observation"];

/// Selects which keys take part in a fingerprint.
///
/// # Examples
///
/// ```
/// use intelmsg::message::domain::FingerprintFilter;
///
/// let filter = FingerprintFilter::default();
/// assert!(!filter.admits("time.observation"));
/// assert!(filter.admits("feed.name"));
///
/// let only_source = FingerprintFilter::include(["source.ip"]);
/// assert!(only_source.admits("source.ip"));
/// assert!(!only_source.admits("feed.name"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FingerprintFilter {
    /// Every key except the listed ones.
    Exclude(Vec<String>),
    /// Only the listed keys.
    Include(Vec<String>),
}

impl FingerprintFilter {
    /// Creates a filter that skips the listed keys.
    #[must_use]
    pub fn exclude<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exclude(keys.into_iter().map(Into::into).collect())
    }

    /// Creates a filter that keeps only the listed keys.
    #[must_use]
    pub fn include<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Include(keys.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if `key` takes part in the fingerprint.
    #[must_use]
    pub fn admits(&self, key: &str) -> bool {
        match self {
            Self::Exclude(keys) => !keys.iter().any(|k| k == key),
            Self::Include(keys) => keys.iter().any(|k| k == key),
        }
    }
}

impl Default for FingerprintFilter {
    fn default() -> Self {
        Self::exclude(VOLATILE_KEYS)
    }
}

/// SHA-256 digest over the key-sorted `(key, value)` pairs of a message.
///
/// Pairs are framed as netstrings (`<len>:<bytes>,`) so that no choice of
/// key or value can collide with a different split of the same bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Computes the fingerprint of the given pairs. Input order is irrelevant.
    #[must_use]
    pub fn of<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let sorted: BTreeMap<&str, &str> = pairs.into_iter().collect();
        let mut hasher = Sha256::new();
        for (key, value) in sorted {
            write_netstring(&mut hasher, key);
            write_netstring(&mut hasher, value);
        }
        Self(hasher.finalize().into())
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

fn write_netstring(hasher: &mut Sha256, text: &str) {
    hasher.update(text.len().to_string());
    hasher.update(":");
    hasher.update(text);
    hasher.update(",");
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}
