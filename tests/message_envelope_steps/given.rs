//! Given steps for message envelope BDD scenarios.

use super::world::EnvelopeWorld;
use intelmsg::message::{domain::MessageKind, services::MessageFactory};
use rstest_bdd_macros::given;

#[given("a message factory with the bundled harmonization")]
fn bundled_factory(world: &mut EnvelopeWorld) {
    world.factory = Some(MessageFactory::default());
}

#[given(r#"an empty "{kind}""#)]
fn empty_message(world: &mut EnvelopeWorld, kind: String) -> Result<(), eyre::Report> {
    let message_kind = kind
        .parse::<MessageKind>()
        .map_err(|err| eyre::eyre!("invalid kind in scenario: {err}"))?;
    let envelope = world.factory()?.create(message_kind);
    world.message = Some(envelope);
    Ok(())
}

#[given(r#"the message holds "{key}" set to "{value}""#)]
fn message_holds(
    world: &mut EnvelopeWorld,
    key: String,
    value: String,
) -> Result<(), eyre::Report> {
    world
        .message_mut()?
        .add(&key, &value)
        .map_err(|err| eyre::eyre!("failed to populate '{key}': {err}"))
}
