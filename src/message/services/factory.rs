//! Wire-level construction and serialization of tagged messages.

use crate::message::{
    domain::{DISCRIMINATOR, Envelope, Event, Message, MessageKind, MessageResult, Report},
    error::MessageError,
    harmonization::Harmonization,
    ports::TypeRegistry,
};
use serde_json::Value;
use std::sync::Arc;

/// Builds messages from their flat wire form and back.
///
/// The factory owns the registry every message it creates is governed by.
///
/// # Examples
///
/// ```
/// use intelmsg::message::{domain::MessageKind, services::MessageFactory};
///
/// let factory = MessageFactory::default();
/// let mut report = factory
///     .unserialize(r#"{"__type": "Report"}"#)
///     .expect("valid document");
/// assert_eq!(report.kind(), MessageKind::Report);
///
/// report.add("feed.name", "Example").expect("valid name");
/// assert_eq!(
///     MessageFactory::serialize(&report).expect("serializable"),
///     r#"{"__type":"Report","feed.name":"Example"}"#,
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MessageFactory {
    registry: Arc<dyn TypeRegistry>,
}

impl MessageFactory {
    /// Creates a factory whose messages are governed by `registry`.
    #[must_use]
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry handed to created messages.
    #[must_use]
    pub const fn registry(&self) -> &Arc<dyn TypeRegistry> {
        &self.registry
    }

    /// Creates an empty message of the given variant.
    #[must_use]
    pub fn create(&self, kind: MessageKind) -> Envelope {
        Envelope::new(kind, Arc::clone(&self.registry))
    }

    /// Creates an empty report.
    #[must_use]
    pub fn report(&self) -> Report {
        Report::new(Arc::clone(&self.registry))
    }

    /// Creates an empty event.
    #[must_use]
    pub fn event(&self) -> Event {
        Event::new(Arc::clone(&self.registry))
    }

    /// Builds a message from its flat wire form.
    ///
    /// Every data key is loaded through the validated
    /// [`Message::add`] pipeline, so the result satisfies the same invariants
    /// as a message populated by hand.
    ///
    /// # Errors
    ///
    /// - [`MessageError::MalformedJson`] if `text` is not JSON
    /// - [`MessageError::InvalidArgument`] if the document is not an object, or
    ///   its discriminator is missing, abstract, or unknown
    /// - [`MessageError::InvalidKey`] or [`MessageError::InvalidValue`] if a
    ///   data key is rejected by the variant
    pub fn unserialize(&self, text: &str) -> MessageResult<Envelope> {
        let document: Value = serde_json::from_str(text).map_err(|err| {
            tracing::debug!(error = %err, "rejecting malformed message document");
            MessageError::MalformedJson(err.to_string())
        })?;

        let Value::Object(mut fields) = document else {
            return Err(MessageError::invalid_argument(
                "message document must be a JSON object",
            ));
        };

        let kind = match fields.shift_remove(DISCRIMINATOR) {
            Some(Value::String(name)) => MessageKind::try_from(name.as_str()).inspect_err(|err| {
                tracing::debug!(discriminator = %name, error = %err, "rejecting discriminator");
            })?,
            Some(other) => {
                return Err(MessageError::invalid_argument(format!(
                    "discriminator must be a string, found {other}"
                )));
            }
            None => {
                return Err(MessageError::invalid_argument(format!(
                    "message document lacks '{DISCRIMINATOR}'"
                )));
            }
        };

        let mut envelope = self.create(kind);
        for (key, value) in &fields {
            let Value::String(text_value) = value else {
                return Err(MessageError::invalid_value(key, value.to_string()));
            };
            envelope.add(key, text_value)?;
        }
        Ok(envelope)
    }

    /// Produces the flat wire form of `message`.
    ///
    /// Identical to [`Message::serialize`].
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Serialization`] if encoding fails.
    pub fn serialize(message: &Message) -> MessageResult<String> {
        message.serialize()
    }
}

impl Default for MessageFactory {
    fn default() -> Self {
        Self::new(Arc::new(Harmonization::default()))
    }
}
