//! Harmonization: the default [`TypeRegistry`] adapter.
//!
//! A harmonization assigns every field of every variant a [`FieldType`]. It is
//! resolved once, either from the bundled vocabulary or from a JSON document
//! of the form:
//!
//! ```json
//! {
//!     "report": { "feed.url": { "type": "URL", "description": "..." } },
//!     "event": { "source.ip": { "type": "IPAddress" } }
//! }
//! ```

mod types;
mod vocabulary;

pub use types::{CLASSIFICATION_TYPES, FieldType, encode_raw};

use crate::message::{
    domain::{DISCRIMINATOR, MessageKind},
    error::HarmonizationError,
    ports::TypeRegistry,
};
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Result type for harmonization loading.
pub type HarmonizationResult<T> = Result<T, HarmonizationError>;

/// Declaration of a single harmonized field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The rule governing the field's values.
    pub field_type: FieldType,
    /// Human-readable description.
    pub description: String,
}

impl FieldSpec {
    /// Creates a field declaration.
    #[must_use]
    pub fn new(field_type: FieldType, description: impl Into<String>) -> Self {
        Self {
            field_type,
            description: description.into(),
        }
    }
}

/// Per-variant field vocabulary with type rules.
///
/// # Examples
///
/// ```
/// use intelmsg::message::{
///     domain::MessageKind, harmonization::Harmonization, ports::TypeRegistry,
/// };
///
/// let harmonization = Harmonization::default();
/// assert!(harmonization.has_rule(MessageKind::Report, "feed.url"));
/// assert!(!harmonization.has_rule(MessageKind::Report, "source.ip"));
/// assert!(harmonization.has_rule(MessageKind::Event, "source.ip"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harmonization {
    report: BTreeMap<String, FieldSpec>,
    event: BTreeMap<String, FieldSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[serde(default)]
    report: BTreeMap<String, DocumentField>,
    #[serde(default)]
    event: BTreeMap<String, DocumentField>,
}

#[derive(Debug, Deserialize)]
struct DocumentField {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    description: String,
}

impl Harmonization {
    /// Builds a harmonization from per-variant declarations.
    ///
    /// # Errors
    ///
    /// Returns [`HarmonizationError`] if the declarations are inconsistent:
    /// a reserved key, a key declared with two types, or a key that is also
    /// the dotted parent of another key.
    pub fn from_fields(
        report: BTreeMap<String, FieldSpec>,
        event: BTreeMap<String, FieldSpec>,
    ) -> HarmonizationResult<Self> {
        for fields in [&report, &event] {
            check_keys(fields)?;
        }
        for (key, spec) in &report {
            if event
                .get(key)
                .is_some_and(|other| other.field_type != spec.field_type)
            {
                return Err(HarmonizationError::ConflictingType(key.clone()));
            }
        }
        Ok(Self { report, event })
    }

    /// Parses a harmonization document.
    ///
    /// # Errors
    ///
    /// Returns [`HarmonizationError::Parse`] for malformed JSON,
    /// [`HarmonizationError::UnknownType`] for an unrecognised type name, or
    /// any error of [`Harmonization::from_fields`].
    pub fn from_json(text: &str) -> HarmonizationResult<Self> {
        let document: Document =
            serde_json::from_str(text).map_err(|e| HarmonizationError::parse(e.to_string()))?;
        let report = resolve_fields(document.report)?;
        let event = resolve_fields(document.event)?;
        let harmonization = Self::from_fields(report, event)?;
        tracing::debug!(
            report_fields = harmonization.report.len(),
            event_fields = harmonization.event.len(),
            "harmonization loaded"
        );
        Ok(harmonization)
    }

    /// Reads and parses a harmonization document from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`HarmonizationError::Io`] if the file cannot be read, or any
    /// error of [`Harmonization::from_json`].
    pub fn from_dir(dir: &Dir, file_name: &str) -> HarmonizationResult<Self> {
        let text = dir.read_to_string(file_name)?;
        Self::from_json(&text)
    }

    /// Reads and parses a harmonization document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HarmonizationError::Io`] if the file cannot be read, or any
    /// error of [`Harmonization::from_json`].
    pub fn from_path(path: &Utf8Path) -> HarmonizationResult<Self> {
        let file_name = path.file_name().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path must name a file")
        })?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        Self::from_dir(&dir, file_name)
    }

    /// Returns the declarations of a variant, ordered by key.
    pub fn fields(&self, kind: MessageKind) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.vocabulary(kind)
            .iter()
            .map(|(key, spec)| (key.as_str(), spec))
    }

    /// Returns the declaration of `key` for a variant.
    #[must_use]
    pub fn spec(&self, kind: MessageKind, key: &str) -> Option<&FieldSpec> {
        self.vocabulary(kind).get(key)
    }

    /// Returns the type rule of `key` in any variant.
    #[must_use]
    pub fn field_type(&self, key: &str) -> Option<FieldType> {
        self.event
            .get(key)
            .or_else(|| self.report.get(key))
            .map(|spec| spec.field_type)
    }

    const fn vocabulary(&self, kind: MessageKind) -> &BTreeMap<String, FieldSpec> {
        match kind {
            MessageKind::Report => &self.report,
            MessageKind::Event => &self.event,
        }
    }
}

impl Default for Harmonization {
    /// Returns the bundled vocabulary.
    fn default() -> Self {
        Self {
            report: vocabulary::report_fields(),
            event: vocabulary::event_fields(),
        }
    }
}

impl TypeRegistry for Harmonization {
    fn has_rule(&self, kind: MessageKind, key: &str) -> bool {
        self.vocabulary(kind).contains_key(key)
    }

    fn validate(&self, key: &str, value: &str) -> bool {
        self.field_type(key)
            .is_some_and(|field_type| field_type.validate(value))
    }

    fn sanitize(&self, key: &str, value: &str) -> Option<String> {
        self.field_type(key)
            .and_then(|field_type| field_type.sanitize(value))
    }
}

fn resolve_fields(
    fields: BTreeMap<String, DocumentField>,
) -> HarmonizationResult<BTreeMap<String, FieldSpec>> {
    fields
        .into_iter()
        .map(|(key, field)| match FieldType::try_from(field.type_name.as_str()) {
            Ok(field_type) => Ok((key, FieldSpec::new(field_type, field.description))),
            Err(type_name) => Err(HarmonizationError::UnknownType { key, type_name }),
        })
        .collect()
}

fn check_keys(fields: &BTreeMap<String, FieldSpec>) -> HarmonizationResult<()> {
    for key in fields.keys() {
        if key == DISCRIMINATOR {
            return Err(HarmonizationError::ReservedKey(key.clone()));
        }
        let prefix = format!("{key}.");
        if let Some(nested) = fields
            .range(prefix.clone()..)
            .next()
            .map(|(nested, _)| nested)
            .filter(|nested| nested.starts_with(&prefix))
        {
            return Err(HarmonizationError::ShadowedKey {
                key: key.clone(),
                nested: nested.clone(),
            });
        }
    }
    Ok(())
}
