//! Behavioural integration tests for message construction and transport.
//!
//! These tests follow a payload from collection through parsing, checking
//! that every hand-off between stages preserves the message exactly.

use camino::Utf8PathBuf;
use cap_std::{ambient_authority, fs_utf8::Dir};
use eyre::{Result, eyre};
use intelmsg::message::{
    domain::{AddOptions, Event, MessageKind},
    error::{HarmonizationError, MessageError},
    harmonization::{Harmonization, encode_raw},
    services::MessageFactory,
};
use mockable::DefaultClock;
use serde_json::{Value, json};
use std::sync::Arc;

// ============================================================================
// Scenario: Collected report travels to a parser
// ============================================================================

/// A collector builds a report, ships it as text, and a parser derives an
/// event from the received report.
#[test]
fn collected_report_becomes_parsed_event() -> Result<()> {
    // Arrange
    let factory = MessageFactory::default();
    let mut report = factory.report();
    report.add("feed.name", "Example")?;
    report.add("feed.url", "https://example.com/")?;
    report.add("raw", &encode_raw(b"192.0.2.1,scanner"))?;
    report.stamp_observation_time(&DefaultClock)?;

    // Act
    let wire = report.serialize()?;
    let received = factory
        .unserialize(&wire)?
        .into_report()
        .ok_or_else(|| eyre!("expected a report on the wire"))?;
    let mut event = Event::from_report(&received)?;
    let sanitize = AddOptions::new().sanitize();
    event.add_with("source.ip", " 192.0.2.1 ", &sanitize)?;
    event.add_with("classification.type", "Scanner", &sanitize)?;
    event.add("raw", received.get("raw")?)?;

    // Assert
    assert_eq!(received, report);
    assert_eq!(event.get("feed.name")?, "Example");
    assert_eq!(event.get("source.ip")?, "192.0.2.1");
    assert_eq!(event.get("classification.type")?, "scanner");
    assert_eq!(
        event.get("time.observation")?,
        report.get("time.observation")?
    );
    Ok(())
}

// ============================================================================
// Scenario: Wire text has the documented shape
// ============================================================================

/// The wire form is a flat object whose only structural key is the
/// discriminator.
#[test]
fn report_wire_text_is_flat_and_tagged() -> Result<()> {
    // Arrange
    let factory = MessageFactory::default();
    let mut report = factory.report();
    report.add("feed.name", "Example")?;
    report.add("feed.url", "https://example.com/")?;
    report.add("raw", "bG9yZW0gaXBzdW0=")?;

    // Act
    let wire = MessageFactory::serialize(&report)?;
    let parsed: Value = serde_json::from_str(&wire)?;

    // Assert
    assert_eq!(
        parsed,
        json!({
            "__type": "Report",
            "feed.name": "Example",
            "feed.url": "https://example.com/",
            "raw": "bG9yZW0gaXBzdW0=",
        })
    );
    let reparsed = factory.unserialize(&wire)?;
    assert_eq!(reparsed.serialize()?, wire);
    Ok(())
}

// ============================================================================
// Scenario: Sanitizing repairs what validation rejects
// ============================================================================

/// A feed URL with trailing control characters is refused verbatim but
/// accepted once sanitized.
#[test]
fn sanitizing_repairs_rejected_feed_url() -> Result<()> {
    // Arrange
    let factory = MessageFactory::default();
    let mut report = factory.report();
    let unsane = "https://example.com/ \r\n";

    // Act
    let verbatim = report.add("feed.url", unsane);
    report.add_with("feed.url", unsane, &AddOptions::new().sanitize())?;

    // Assert
    assert!(verbatim.is_err_and(|err| err.is_invalid_value()));
    assert_eq!(report.get("feed.url")?, "https://example.com/");
    Ok(())
}

// ============================================================================
// Scenario: Nested view of an event
// ============================================================================

/// Consumers that prefer structured data receive keys split on dots.
#[test]
fn event_exposes_nested_view() -> Result<()> {
    // Arrange
    let factory = MessageFactory::default();
    let mut event = factory.event();
    event.add("source.ip", "192.0.2.1")?;
    event.add("source.port", "443")?;
    event.add("comment", "seen twice")?;

    // Act
    let nested = event.to_dict()?;

    // Assert
    assert_eq!(
        nested,
        json!({
            "source": {"ip": "192.0.2.1", "port": "443"},
            "comment": "seen twice",
        })
    );
    assert!(!event.to_json()?.contains("__type"));
    Ok(())
}

// ============================================================================
// Scenario: Deep copies are independent of their source
// ============================================================================

/// Editing a deep copy never leaks into the original message.
#[test]
fn deep_copy_is_independent() -> Result<()> {
    // Arrange
    let factory = MessageFactory::default();
    let mut original = factory.event();
    original.add("malware.name", "zeus")?;

    // Act
    let mut copy = original.deep_copy_event();
    copy.set("malware.name", "citadel")?;

    // Assert
    assert_eq!(original.get("malware.name")?, "zeus");
    assert_eq!(copy.get("malware.name")?, "citadel");
    Ok(())
}

// ============================================================================
// Scenario: Deployments supply their own harmonization
// ============================================================================

/// A harmonization document on disk governs the messages of a factory.
#[test]
fn custom_harmonization_governs_factory() -> Result<()> {
    // Arrange
    let temp = Utf8PathBuf::try_from(std::env::temp_dir())
        .map_err(|err| eyre!("temp dir is not UTF-8: {err}"))?;
    let dir = Dir::open_ambient_dir(&temp, ambient_authority())?;
    let file_name = format!("intelmsg-harmonization-{}.json", std::process::id());
    let document = json!({
        "report": {"feed.name": {"type": "String"}},
        "event": {
            "feed.name": {"type": "String"},
            "destination.port": {"type": "Integer", "description": "Port"}
        }
    });
    dir.write(&file_name, document.to_string())?;

    // Act
    let from_dir = Harmonization::from_dir(&dir, &file_name);
    let from_path = Harmonization::from_path(&temp.join(&file_name));
    dir.remove_file(&file_name)?;
    let loaded = from_dir?;
    let factory = MessageFactory::new(Arc::new(loaded.clone()));
    let mut event = factory.event();

    // Assert
    assert_eq!(from_path?, loaded);
    event.add("destination.port", "8080")?;
    assert_eq!(
        event.add("source.ip", "192.0.2.1"),
        Err(MessageError::InvalidKey("source.ip".to_owned()))
    );
    assert!(matches!(
        factory.create(MessageKind::Report).add("destination.port", "1"),
        Err(MessageError::InvalidKey(_))
    ));
    Ok(())
}

/// Reading a missing document through a directory handle reports the I/O
/// failure.
#[test]
fn missing_document_in_directory_is_reported() -> Result<()> {
    // Arrange
    let temp = Utf8PathBuf::try_from(std::env::temp_dir())
        .map_err(|err| eyre!("temp dir is not UTF-8: {err}"))?;
    let dir = Dir::open_ambient_dir(&temp, ambient_authority())?;

    // Act
    let result = Harmonization::from_dir(&dir, "intelmsg-no-such-harmonization.json");

    // Assert
    assert!(matches!(result, Err(HarmonizationError::Io(_))));
    Ok(())
}

// ============================================================================
// Scenario: Only concrete variants travel
// ============================================================================

/// Documents naming the abstract base or an unknown variant are refused.
#[test]
fn abstract_and_unknown_variants_are_refused() {
    // Arrange
    let factory = MessageFactory::default();

    // Act
    let abstract_base = factory.unserialize(r#"{"__type": "Message"}"#);
    let unknown = factory.unserialize(r#"{"__type": "Invalid"}"#);

    // Assert
    assert!(matches!(abstract_base, Err(MessageError::InvalidArgument(_))));
    assert!(matches!(unknown, Err(MessageError::InvalidArgument(_))));
}
