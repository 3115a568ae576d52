//! Domain types for the message subsystem.
//!
//! This module contains the message container, its variants and the value
//! types they are built from. Nothing here performs I/O.

mod fingerprint;
mod kind;
mod message;
mod options;
mod value;
mod variants;

pub use fingerprint::{Fingerprint, FingerprintFilter, VOLATILE_KEYS};
pub use kind::{DISCRIMINATOR, MessageKind};
pub use message::{FindItems, Message, MessageResult, OBSERVATION_TIME};
pub use options::{ABSENT_VALUES, AddOptions};
pub use value::FieldValue;
pub use variants::{Envelope, Event, Report};
