//! The canonical message envelope exchanged between pipeline stages.
//!
//! A message is a flat, ordered mapping from dotted keys to text values whose
//! vocabulary and value rules come from a type registry.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::Message`], [`domain::Report`], [`domain::Event`], [`domain::Envelope`])
//! - **Ports**: Abstract trait interfaces ([`ports::TypeRegistry`])
//! - **Harmonization**: The default registry ([`harmonization::Harmonization`])
//! - **Services**: Wire-level construction ([`services::MessageFactory`])
//!
//! # Example
//!
//! ```
//! use intelmsg::message::{domain::AddOptions, services::MessageFactory};
//!
//! let factory = MessageFactory::default();
//! let mut report = factory.report();
//! report.add("feed.name", "Example").expect("valid name");
//! report
//!     .add_with("feed.url", "https://example.com/ \r\n", &AddOptions::new().sanitize())
//!     .expect("sanitized url");
//! report.add("raw", "bG9yZW0gaXBzdW0=").expect("valid payload");
//!
//! let wire = report.serialize().expect("serializable");
//! let restored = factory.unserialize(&wire).expect("valid document");
//! assert_eq!(restored.serialize().expect("serializable"), wire);
//! ```

pub mod domain;
pub mod error;
pub mod harmonization;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
