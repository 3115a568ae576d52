//! Intelmsg: the message envelope of a threat-intelligence ingestion pipeline.
//!
//! This crate provides the self-describing record passed between pipeline
//! stages, in two variants: reports carrying raw feed payloads and events
//! carrying normalised findings.
//!
//! # Architecture
//!
//! Intelmsg follows hexagonal architecture principles:
//!
//! - **Domain**: Pure data types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external collaborators
//! - **Adapters**: Concrete implementations of ports (the bundled harmonization)
//!
//! # Modules
//!
//! - [`message`]: Message container, variants, type registry and factory

pub mod message;
