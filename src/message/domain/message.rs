//! The flat, schema-governed key/value container shared by all variants.
//!
//! Every key is a dotted path (`feed.url`, `time.observation`, `raw`) that
//! must belong to the variant's vocabulary in the [`TypeRegistry`]. Values
//! are validated on the way in and never hold an absent-equivalent.

use super::{AddOptions, DISCRIMINATOR, FieldValue, MessageKind};
use crate::message::{error::MessageError, ports::TypeRegistry};
use chrono::SecondsFormat;
use indexmap::IndexMap;
use mockable::Clock;
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

/// Key holding the time a collector observed the data.
pub const OBSERVATION_TIME: &str = "time.observation";

/// Result type for message operations.
pub type MessageResult<T> = Result<T, MessageError>;

/// An ordered mapping from dotted keys to validated text values.
///
/// # Invariants
///
/// - Every stored key is recognised by the registry for `kind`
/// - No stored value is absent-equivalent (`""`, `"-"`, `"N/A"`)
/// - Insertion order is preserved for iteration and serialization
/// - The discriminator is never a data key
///
/// Cloning is a shallow copy: the new container shares value storage with
/// the original. Use [`Message::deep_copy`] for independent storage.
///
/// # Examples
///
/// ```
/// use intelmsg::message::{
///     domain::{Message, MessageKind},
///     harmonization::Harmonization,
/// };
/// use std::sync::Arc;
///
/// let mut report = Message::new(MessageKind::Report, Arc::new(Harmonization::default()));
/// report.add("feed.name", "Example").expect("valid name");
///
/// assert_eq!(report.get("feed.name").expect("stored"), "Example");
/// assert!(report.add("feed.name", "Other").is_err());
/// ```
#[derive(Clone)]
pub struct Message {
    kind: MessageKind,
    fields: IndexMap<String, FieldValue>,
    registry: Arc<dyn TypeRegistry>,
}

impl Message {
    /// Creates an empty message of the given variant.
    #[must_use]
    pub fn new(kind: MessageKind, registry: Arc<dyn TypeRegistry>) -> Self {
        Self {
            kind,
            fields: IndexMap::new(),
            registry,
        }
    }

    /// Returns the message variant.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns the registry governing this message.
    #[must_use]
    pub const fn registry(&self) -> &Arc<dyn TypeRegistry> {
        &self.registry
    }

    /// Adds a value under a key that must not already be populated.
    ///
    /// The value is validated but not sanitized.
    ///
    /// # Errors
    ///
    /// See [`Message::add_with`].
    pub fn add(&mut self, key: &str, value: &str) -> MessageResult<()> {
        self.add_with(key, value, &AddOptions::new())
    }

    /// Adds a value, controlled by `options`.
    ///
    /// Absent-equivalent values (`""`, `"-"`, `"N/A"` and anything listed in
    /// the options' ignore set) are absorbed without storing anything, both
    /// as passed and after sanitizing.
    ///
    /// # Errors
    ///
    /// - [`MessageError::InvalidKey`] if the key is outside the vocabulary
    /// - [`MessageError::KeyExists`] if the key is populated and `force` is unset
    /// - [`MessageError::InvalidValue`] if sanitizing or validation fails
    ///
    /// The message is unchanged on every error.
    pub fn add_with(&mut self, key: &str, value: &str, options: &AddOptions) -> MessageResult<()> {
        if !self.is_known_key(key) {
            return Err(MessageError::InvalidKey(key.to_owned()));
        }

        if options.is_ignored(value) {
            tracing::debug!(kind = %self.kind, key, value, "ignoring absent value");
            return Ok(());
        }

        if !options.is_force() && self.contains(key) {
            return Err(MessageError::KeyExists(key.to_owned()));
        }

        let accepted = self.prepare(key, value, options.is_sanitize())?;
        if options.is_ignored(&accepted) {
            tracing::debug!(kind = %self.kind, key, value, "ignoring value sanitized to absent");
            return Ok(());
        }
        tracing::trace!(kind = %self.kind, key, "field stored");
        self.fields.insert(key.to_owned(), FieldValue::from(accepted));
        Ok(())
    }

    /// Replaces the value of a key that is already populated.
    ///
    /// # Errors
    ///
    /// See [`Message::update_with`].
    pub fn update(&mut self, key: &str, value: &str) -> MessageResult<()> {
        self.update_with(key, value, &AddOptions::new())
    }

    /// Replaces the value of a populated key, running the same pipeline as
    /// [`Message::add_with`] with overwriting enabled.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::KeyNotExists`] if the key holds no value, or
    /// any error of [`Message::add_with`].
    pub fn update_with(
        &mut self,
        key: &str,
        value: &str,
        options: &AddOptions,
    ) -> MessageResult<()> {
        if !self.contains(key) {
            return Err(MessageError::KeyNotExists(key.to_owned()));
        }
        self.add_with(key, value, &options.clone().force())
    }

    /// Indexed write: validates and stores, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// See [`Message::add_with`].
    pub fn set(&mut self, key: &str, value: &str) -> MessageResult<()> {
        self.add_with(key, value, &AddOptions::new().force())
    }

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::KeyNotExists`] if the key holds no value.
    pub fn get(&self, key: &str) -> MessageResult<&str> {
        self.field(key)
            .map(FieldValue::as_str)
            .ok_or_else(|| MessageError::KeyNotExists(key.to_owned()))
    }

    /// Alias of [`Message::get`].
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::KeyNotExists`] if the key holds no value.
    pub fn value(&self, key: &str) -> MessageResult<&str> {
        self.get(key)
    }

    /// Returns the stored value handle for `key`, if any.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Returns `true` if `key` holds a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Removes `key` and returns its value.
    ///
    /// The relative order of the remaining keys is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::KeyNotExists`] if the key holds no value.
    pub fn remove(&mut self, key: &str) -> MessageResult<FieldValue> {
        self.fields
            .shift_remove(key)
            .ok_or_else(|| MessageError::KeyNotExists(key.to_owned()))
    }

    /// Removes `key`, discarding its value.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::KeyNotExists`] if the key holds no value.
    pub fn clear(&mut self, key: &str) -> MessageResult<()> {
        self.remove(key).map(drop)
    }

    /// Returns the `(key, value)` pairs whose key starts with `prefix`.
    ///
    /// The returned iterator is `Clone`, so a result can be traversed more
    /// than once.
    #[must_use]
    pub fn finditems<'a>(&'a self, prefix: &'a str) -> FindItems<'a> {
        FindItems {
            inner: self.fields.iter(),
            prefix,
        }
    }

    /// Returns all `(key, value)` pairs in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &FieldValue)> + Clone + '_ {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns all keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if `value` would be accepted for `key` without sanitizing.
    ///
    /// Does not consider whether the key is already populated.
    #[must_use]
    pub fn is_valid(&self, key: &str, value: &str) -> bool {
        self.is_known_key(key) && self.registry.validate(key, value)
    }

    /// Stores the current time of `clock` as the observation time, unless
    /// one is already present.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidKey`] if the variant has no observation
    /// time, or [`MessageError::InvalidValue`] if the registry rejects it.
    pub fn stamp_observation_time(&mut self, clock: &impl Clock) -> MessageResult<()> {
        if self.contains(OBSERVATION_TIME) {
            return Ok(());
        }
        let now = clock.utc().to_rfc3339_opts(SecondsFormat::Secs, false);
        self.add(OBSERVATION_TIME, &now)
    }

    /// Returns a new container sharing value storage with this one.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns a new container whose values own independent storage.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            kind: self.kind,
            fields: self
                .fields
                .iter()
                .map(|(key, value)| (key.clone(), value.detached()))
                .collect(),
            registry: Arc::clone(&self.registry),
        }
    }

    /// Converts the flat mapping into a nested one by splitting keys on `.`.
    ///
    /// The discriminator is not part of the result.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidKey`] if a key is both a leaf and the
    /// parent of another key.
    pub fn to_dict(&self) -> MessageResult<Value> {
        let mut root = Map::new();
        for (key, value) in &self.fields {
            insert_nested(&mut root, key, value)?;
        }
        Ok(Value::Object(root))
    }

    /// Returns the nested form of [`Message::to_dict`] as JSON text.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Message::to_dict`].
    pub fn to_json(&self) -> MessageResult<String> {
        Ok(serde_json::to_string(&self.to_dict()?)?)
    }

    /// Returns the flat wire form: the discriminator followed by every key in
    /// insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Serialization`] if encoding fails.
    pub fn serialize(&self) -> MessageResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn is_known_key(&self, key: &str) -> bool {
        key != DISCRIMINATOR && self.registry.has_rule(self.kind, key)
    }

    fn prepare(&self, key: &str, value: &str, sanitize: bool) -> MessageResult<String> {
        let candidate = if sanitize {
            self.registry
                .sanitize(key, value)
                .ok_or_else(|| MessageError::invalid_value(key, value))?
        } else {
            value.to_owned()
        };

        if self.registry.validate(key, &candidate) {
            Ok(candidate)
        } else {
            Err(MessageError::invalid_value(key, value))
        }
    }
}

fn insert_nested(root: &mut Map<String, Value>, key: &str, value: &FieldValue) -> MessageResult<()> {
    let (parents, leaf) = key.rsplit_once('.').map_or((None, key), |(p, l)| (Some(p), l));

    let mut node = root;
    for segment in parents.into_iter().flat_map(|path| path.split('.')) {
        node = node
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| MessageError::InvalidKey(key.to_owned()))?;
    }

    if node.contains_key(leaf) {
        return Err(MessageError::InvalidKey(key.to_owned()));
    }
    node.insert(leaf.to_owned(), Value::String(value.to_string()));
    Ok(())
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.fields == other.fields
    }
}

impl Eq for Message {}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("kind", &self.kind)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.serialize().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(DISCRIMINATOR, self.kind.as_str())?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Iterator over the fields whose key starts with a prefix.
///
/// Produced by [`Message::finditems`].
#[derive(Debug, Clone)]
pub struct FindItems<'a> {
    inner: indexmap::map::Iter<'a, String, FieldValue>,
    prefix: &'a str,
}

impl<'a> Iterator for FindItems<'a> {
    type Item = (&'a str, &'a FieldValue);

    fn next(&mut self) -> Option<Self::Item> {
        let prefix = self.prefix;
        self.inner
            .by_ref()
            .find(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.as_str(), value))
    }
}
