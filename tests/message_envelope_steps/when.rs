//! When steps for message envelope BDD scenarios.

use super::world::EnvelopeWorld;
use intelmsg::message::domain::AddOptions;
use rstest_bdd_macros::when;

#[when("the message is serialized")]
fn serialize_message(world: &mut EnvelopeWorld) -> Result<(), eyre::Report> {
    let text = world.message()?.serialize()?;
    world.wire_text = Some(text);
    Ok(())
}

#[when(r#"the field "{key}" is added with value "{value}""#)]
fn add_field(world: &mut EnvelopeWorld, key: String, value: String) -> Result<(), eyre::Report> {
    let result = world.message_mut()?.add(&key, &value);
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"the field "{key}" is sanitized from "{value}""#)]
fn sanitize_field(
    world: &mut EnvelopeWorld,
    key: String,
    value: String,
) -> Result<(), eyre::Report> {
    let options = AddOptions::new().sanitize();
    let result = world.message_mut()?.add_with(&key, &value, &options);
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"a copy is observed again at "{timestamp}""#)]
fn observe_copy(world: &mut EnvelopeWorld, timestamp: String) -> Result<(), eyre::Report> {
    let mut copy = world
        .message()?
        .as_event()
        .ok_or_else(|| eyre::eyre!("scenario message is not an event"))?
        .deep_copy_event();
    copy.set("time.observation", &timestamp)?;
    world.observed_copy = Some(copy);
    Ok(())
}

#[when(r#"a document tagged "{kind}" is unserialized"#)]
fn unserialize_tagged(world: &mut EnvelopeWorld, kind: String) -> Result<(), eyre::Report> {
    let document = serde_json::json!({ "__type": kind }).to_string();
    let result = world.factory()?.unserialize(&document);
    world.unserialized = Some(result);
    Ok(())
}
