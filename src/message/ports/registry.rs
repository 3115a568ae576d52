//! Type registry port for field vocabulary and value rules.
//!
//! Defines the abstract interface a message consults for every mutation:
//! whether a key belongs to a variant's vocabulary, and how values for that
//! key are validated and sanitized.

use crate::message::domain::MessageKind;
use std::fmt::Debug;

/// Port for harmonization lookups.
///
/// Mutation runs in layers:
/// 1. Vocabulary check ([`TypeRegistry::has_rule`])
/// 2. Optional normalisation ([`TypeRegistry::sanitize`])
/// 3. Type validation ([`TypeRegistry::validate`])
///
/// # Implementation Notes
///
/// Implementations should:
/// - Be stateless and thread-safe after construction
/// - Never accept the discriminator key as a data key
/// - Return `false` from `validate` for keys they do not know
pub trait TypeRegistry: Debug + Send + Sync {
    /// Returns `true` if `key` is part of the vocabulary of `kind`.
    fn has_rule(&self, kind: MessageKind, key: &str) -> bool;

    /// Returns `true` if `value` satisfies the type rule of `key`.
    fn validate(&self, key: &str, value: &str) -> bool;

    /// Normalises `value` according to the type rule of `key`.
    ///
    /// Returns `None` if no normalised form can be produced.
    fn sanitize(&self, key: &str, value: &str) -> Option<String>;
}
