//! Bundled field vocabulary.

use super::{FieldSpec, FieldType};
use std::collections::BTreeMap;

type Declaration = (&'static str, FieldType, &'static str);

/// Fields shared by reports and events.
const FEED_FIELDS: &[Declaration] = &[
    ("feed.accuracy", FieldType::Float, "Accuracy of the feed in percent."),
    ("feed.code", FieldType::String, "Short code identifying the feed."),
    ("feed.name", FieldType::String, "Name of the feed."),
    ("feed.provider", FieldType::String, "Organisation providing the feed."),
    ("feed.url", FieldType::Url, "URL the feed was fetched from."),
    ("raw", FieldType::Base64, "The original payload, base64 encoded."),
    ("rtir_id", FieldType::Integer, "Ticket number in the incident tracker."),
    (
        "time.observation",
        FieldType::DateTime,
        "Time the data was observed by the collector.",
    ),
];

/// Fields only events may carry.
const EVENT_FIELDS: &[Declaration] = &[
    (
        "classification.identifier",
        FieldType::String,
        "Lowest-level identifier of the finding.",
    ),
    (
        "classification.taxonomy",
        FieldType::LowercaseString,
        "Taxonomy the classification type belongs to.",
    ),
    (
        "classification.type",
        FieldType::ClassificationType,
        "Abuse type of the finding.",
    ),
    ("comment", FieldType::String, "Free text commentary."),
    ("destination.fqdn", FieldType::Fqdn, "Domain name of the destination."),
    ("destination.ip", FieldType::IpAddress, "IP address of the destination."),
    ("destination.port", FieldType::Integer, "Port of the destination."),
    ("destination.url", FieldType::Url, "URL of the destination."),
    (
        "event_description.text",
        FieldType::String,
        "Textual description of the finding.",
    ),
    ("malware.name", FieldType::LowercaseString, "Name of the malware family."),
    (
        "protocol.application",
        FieldType::LowercaseString,
        "Application layer protocol.",
    ),
    (
        "protocol.transport",
        FieldType::LowercaseString,
        "Transport layer protocol.",
    ),
    ("source.asn", FieldType::Integer, "Autonomous system of the source."),
    ("source.fqdn", FieldType::Fqdn, "Domain name of the source."),
    ("source.ip", FieldType::IpAddress, "IP address of the source."),
    ("source.network", FieldType::IpNetwork, "Network the source belongs to."),
    ("source.port", FieldType::Integer, "Port of the source."),
    ("source.url", FieldType::Url, "URL of the source."),
    ("status", FieldType::LowercaseString, "Status of the reported resource."),
    (
        "time.source",
        FieldType::DateTime,
        "Time the finding occurred according to the source.",
    ),
];

fn collect<'a>(declarations: impl IntoIterator<Item = &'a Declaration>) -> BTreeMap<String, FieldSpec> {
    declarations
        .into_iter()
        .map(|&(key, field_type, description)| (key.to_owned(), FieldSpec::new(field_type, description)))
        .collect()
}

pub(super) fn report_fields() -> BTreeMap<String, FieldSpec> {
    collect(FEED_FIELDS)
}

pub(super) fn event_fields() -> BTreeMap<String, FieldSpec> {
    collect(FEED_FIELDS.iter().chain(EVENT_FIELDS))
}
