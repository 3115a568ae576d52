//! Then steps for message envelope BDD scenarios.

use super::world::EnvelopeWorld;
use intelmsg::message::error::MessageError;
use rstest_bdd_macros::then;

#[then(r#"the wire text is tagged "{kind}""#)]
fn wire_text_is_tagged(world: &EnvelopeWorld, kind: String) -> Result<(), eyre::Report> {
    let text = world
        .wire_text
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing wire text"))?;
    let expected_prefix = format!(r#"{{"__type":"{kind}""#);

    if !text.starts_with(&expected_prefix) {
        return Err(eyre::eyre!("expected {expected_prefix} prefix, found {text}"));
    }
    Ok(())
}

#[then("unserializing the wire text yields an equal message")]
fn wire_text_round_trips(world: &EnvelopeWorld) -> Result<(), eyre::Report> {
    let text = world
        .wire_text
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing wire text"))?;
    let restored = world.factory()?.unserialize(text)?;

    if &restored != world.message()? {
        return Err(eyre::eyre!("round trip changed the message: {restored:?}"));
    }
    Ok(())
}

#[then("the addition fails with an invalid key error")]
fn addition_fails_with_invalid_key(world: &EnvelopeWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(MessageError::InvalidKey(_))) => Ok(()),
        other => Err(eyre::eyre!("expected invalid key error, found {other:?}")),
    }
}

#[then("the addition succeeds")]
fn addition_succeeds(world: &EnvelopeWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Ok(())) => Ok(()),
        other => Err(eyre::eyre!("expected success, found {other:?}")),
    }
}

#[then("the message has {count:usize} fields")]
fn message_has_fields(world: &EnvelopeWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.message()?.len();
    if actual != count {
        return Err(eyre::eyre!("expected {count} fields, found {actual}"));
    }
    Ok(())
}

#[then(r#"the field "{key}" holds "{value}""#)]
fn field_holds(world: &EnvelopeWorld, key: String, value: String) -> Result<(), eyre::Report> {
    let stored = world.message()?.get(&key)?;
    if stored != value {
        return Err(eyre::eyre!("expected '{value}' in '{key}', found '{stored}'"));
    }
    Ok(())
}

#[then("the copy shares the fingerprint of the message")]
fn copy_shares_fingerprint(world: &EnvelopeWorld) -> Result<(), eyre::Report> {
    let original = world
        .message()?
        .as_event()
        .ok_or_else(|| eyre::eyre!("scenario message is not an event"))?;
    let copy = world
        .observed_copy
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing observed copy"))?;

    if copy == original {
        return Err(eyre::eyre!("copy was not re-observed"));
    }
    if copy.fingerprint() != original.fingerprint() {
        return Err(eyre::eyre!("fingerprints diverged"));
    }
    Ok(())
}

#[then("unserializing fails with an invalid argument error")]
fn unserialize_fails_with_invalid_argument(world: &EnvelopeWorld) -> Result<(), eyre::Report> {
    match world.unserialized.as_ref() {
        Some(Err(MessageError::InvalidArgument(_))) => Ok(()),
        other => Err(eyre::eyre!("expected invalid argument error, found {other:?}")),
    }
}
