//! Shared world state for message envelope BDD scenarios.

use intelmsg::message::{
    domain::{Envelope, Event},
    error::MessageError,
    services::MessageFactory,
};
use rstest::fixture;

/// Scenario world for message envelope behaviour tests.
#[derive(Default)]
pub struct EnvelopeWorld {
    pub factory: Option<MessageFactory>,
    pub message: Option<Envelope>,
    pub observed_copy: Option<Event>,
    pub wire_text: Option<String>,
    pub last_result: Option<Result<(), MessageError>>,
    pub unserialized: Option<Result<Envelope, MessageError>>,
}

impl EnvelopeWorld {
    /// Returns the factory configured by the scenario.
    pub fn factory(&self) -> Result<&MessageFactory, eyre::Report> {
        self.factory
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing message factory in scenario world"))
    }

    /// Returns the message under test.
    pub fn message(&self) -> Result<&Envelope, eyre::Report> {
        self.message
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing message in scenario world"))
    }

    /// Returns the message under test for mutation.
    pub fn message_mut(&mut self) -> Result<&mut Envelope, eyre::Report> {
        self.message
            .as_mut()
            .ok_or_else(|| eyre::eyre!("missing message in scenario world"))
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> EnvelopeWorld {
    EnvelopeWorld::default()
}
