//! The closed set of concrete message variants and their wire discriminator.

use crate::message::error::MessageError;
use serde::{Deserialize, Serialize};

/// Name of the wire field carrying the variant discriminator.
pub const DISCRIMINATOR: &str = "__type";

/// Discriminator value naming the abstract base, which is never constructible.
const ABSTRACT_BASE: &str = "Message";

/// Concrete message variant.
///
/// Serialised as the discriminator value used on the wire:
///
/// ```json
/// { "__type": "Report" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageKind {
    /// Raw feed payload as fetched by a collector.
    Report,

    /// Normalised finding produced by a parser.
    Event,
}

impl MessageKind {
    /// All concrete variants.
    pub const ALL: [Self; 2] = [Self::Report, Self::Event];

    /// Returns the discriminator as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "Report",
            Self::Event => "Event",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for MessageKind {
    type Error = MessageError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "Report" => Ok(Self::Report),
            "Event" => Ok(Self::Event),
            ABSTRACT_BASE => Err(MessageError::invalid_argument(
                "'Message' is abstract and cannot be instantiated",
            )),
            other => Err(MessageError::invalid_argument(format!(
                "unknown message type '{other}'"
            ))),
        }
    }
}

impl std::str::FromStr for MessageKind {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}
