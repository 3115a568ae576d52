//! The concrete message variants and the tagged union over them.
//!
//! Both variants share the whole [`Message`] contract through `Deref`; they
//! differ in the vocabulary the registry grants them, and events carry a
//! deduplication [`Fingerprint`].

use super::{
    AddOptions, Fingerprint, FingerprintFilter, Message, MessageKind, OBSERVATION_TIME,
    MessageResult,
};
use crate::message::ports::TypeRegistry;
use std::{
    hash::{Hash, Hasher},
    ops::{Deref, DerefMut},
    sync::Arc,
};

/// Key prefix of feed metadata carried from a report into its events.
const FEED_PREFIX: &str = "feed.";

/// Keys carried from a report into its events besides feed metadata.
const CARRIED_KEYS: [&str; 2] = ["rtir_id", OBSERVATION_TIME];

/// An unprocessed feed payload.
///
/// # Examples
///
/// ```
/// use intelmsg::message::{domain::Report, harmonization::Harmonization};
/// use std::sync::Arc;
///
/// let mut report = Report::new(Arc::new(Harmonization::default()));
/// report.add("raw", "bG9yZW0gaXBzdW0=").expect("valid base64");
/// assert_eq!(report.get("raw").expect("stored"), "bG9yZW0gaXBzdW0=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report(Message);

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self(Message::new(MessageKind::Report, registry))
    }

    /// Returns the underlying message.
    #[must_use]
    pub fn into_message(self) -> Message {
        self.0
    }
}

/// A normalised finding.
///
/// Two events describing the same finding observed at different times share
/// a [`Fingerprint`]:
///
/// ```
/// use intelmsg::message::{domain::Event, harmonization::Harmonization};
/// use std::sync::Arc;
///
/// let registry = Arc::new(Harmonization::default());
/// let mut first = Event::new(registry.clone());
/// first.add("source.ip", "192.0.2.1").expect("valid ip");
/// first.add("time.observation", "2015-01-01T13:37:00+00:00").expect("valid time");
///
/// let mut second = first.deep_copy_event();
/// second.set("time.observation", "2016-06-06T06:06:06+00:00").expect("valid time");
///
/// assert_eq!(first.fingerprint(), second.fingerprint());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event(Message);

impl Event {
    /// Creates an empty event.
    #[must_use]
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self(Message::new(MessageKind::Event, registry))
    }

    /// Creates an event seeded with the feed metadata and observation time of
    /// `report`, using the report's registry.
    ///
    /// Keys the event vocabulary does not accept are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidValue`](crate::message::error::MessageError::InvalidValue)
    /// if the registry rejects a carried value for events.
    pub fn from_report(report: &Report) -> MessageResult<Self> {
        let registry = Arc::clone(report.registry());
        let mut event = Self::new(Arc::clone(&registry));
        let carried = report.items().filter(|(key, _)| {
            (key.starts_with(FEED_PREFIX) || CARRIED_KEYS.contains(key))
                && registry.has_rule(MessageKind::Event, key)
        });
        for (key, value) in carried {
            event.add_with(key, value, &AddOptions::new())?;
        }
        Ok(event)
    }

    /// Returns the deduplication identity, ignoring volatile keys.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint_with(&FingerprintFilter::default())
    }

    /// Returns the deduplication identity over the keys `filter` admits.
    #[must_use]
    pub fn fingerprint_with(&self, filter: &FingerprintFilter) -> Fingerprint {
        Fingerprint::of(
            self.items()
                .filter(|(key, _)| filter.admits(key))
                .map(|(key, value)| (key, value.as_str())),
        )
    }

    /// Returns an event whose values own independent storage.
    #[must_use]
    pub fn deep_copy_event(&self) -> Self {
        Self(self.0.deep_copy())
    }

    /// Returns the underlying message.
    #[must_use]
    pub fn into_message(self) -> Message {
        self.0
    }
}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint().hash(state);
    }
}

macro_rules! impl_variant_deref {
    ($($variant:ident),+) => {$(
        impl Deref for $variant {
            type Target = Message;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl DerefMut for $variant {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    )+};
}

impl_variant_deref!(Report, Event);

/// A message of either concrete variant.
///
/// This is what the factory hands out for wire text whose variant is only
/// known at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// A report.
    Report(Report),
    /// An event.
    Event(Event),
}

impl Envelope {
    /// Creates an empty message of the given variant.
    #[must_use]
    pub fn new(kind: MessageKind, registry: Arc<dyn TypeRegistry>) -> Self {
        match kind {
            MessageKind::Report => Self::Report(Report::new(registry)),
            MessageKind::Event => Self::Event(Event::new(registry)),
        }
    }

    /// Returns the variant.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Report(_) => MessageKind::Report,
            Self::Event(_) => MessageKind::Event,
        }
    }

    /// Returns the shared message contract.
    #[must_use]
    pub const fn message(&self) -> &Message {
        match self {
            Self::Report(report) => &report.0,
            Self::Event(event) => &event.0,
        }
    }

    /// Returns the shared message contract mutably.
    #[must_use]
    pub fn message_mut(&mut self) -> &mut Message {
        match self {
            Self::Report(report) => &mut report.0,
            Self::Event(event) => &mut event.0,
        }
    }

    /// Returns the report, if this is one.
    #[must_use]
    pub const fn as_report(&self) -> Option<&Report> {
        match self {
            Self::Report(report) => Some(report),
            Self::Event(_) => None,
        }
    }

    /// Returns the event, if this is one.
    #[must_use]
    pub const fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(event) => Some(event),
            Self::Report(_) => None,
        }
    }

    /// Converts into the report, if this is one.
    #[must_use]
    pub fn into_report(self) -> Option<Report> {
        match self {
            Self::Report(report) => Some(report),
            Self::Event(_) => None,
        }
    }

    /// Converts into the event, if this is one.
    #[must_use]
    pub fn into_event(self) -> Option<Event> {
        match self {
            Self::Event(event) => Some(event),
            Self::Report(_) => None,
        }
    }

    /// Returns the underlying message.
    #[must_use]
    pub fn into_message(self) -> Message {
        match self {
            Self::Report(report) => report.into_message(),
            Self::Event(event) => event.into_message(),
        }
    }
}

impl Deref for Envelope {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        self.message()
    }
}

impl DerefMut for Envelope {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.message_mut()
    }
}

impl From<Report> for Envelope {
    fn from(report: Report) -> Self {
        Self::Report(report)
    }
}

impl From<Event> for Envelope {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

impl From<Message> for Envelope {
    fn from(message: Message) -> Self {
        match message.kind() {
            MessageKind::Report => Self::Report(Report(message)),
            MessageKind::Event => Self::Event(Event(message)),
        }
    }
}
