//! Shared, immutable field values.
//!
//! Values are reference counted so that a shallow copy of a message hands out
//! new handles to the same storage, while a deep copy allocates fresh storage.

use serde::{Serialize, Serializer};
use std::{borrow::Borrow, fmt, ops::Deref, sync::Arc};

/// A stored field value.
///
/// Equality and hashing are by content. Storage identity is observable
/// through [`FieldValue::shares_storage`].
///
/// # Examples
///
/// ```
/// use intelmsg::message::domain::FieldValue;
///
/// let value = FieldValue::new("Example");
/// let alias = value.clone();
/// let owned = value.detached();
///
/// assert!(value.shares_storage(&alias));
/// assert!(!value.shares_storage(&owned));
/// assert_eq!(value, owned);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldValue(Arc<str>);

impl FieldValue {
    /// Creates a value with its own storage.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(Arc::from(value.as_ref()))
    }

    /// Returns the value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns an equal value backed by freshly allocated storage.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self::new(self.as_str())
    }

    /// Returns `true` if both values are backed by the same allocation.
    #[must_use]
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for FieldValue {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for FieldValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldValue {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for FieldValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for FieldValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
