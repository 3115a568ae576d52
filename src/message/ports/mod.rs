//! Port trait definitions for the message subsystem.
//!
//! Ports define the abstract interfaces that the domain requires from
//! outside collaborators. Adapters implement these ports to connect the
//! domain to concrete rule sets.

pub mod registry;

pub use registry::TypeRegistry;
