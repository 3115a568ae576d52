//! Type rules governing harmonized field values.
//!
//! Each rule is a pure pair of functions: `validate` decides whether a value
//! may be stored verbatim, `sanitize` makes a best-effort attempt to turn a
//! value into one that validates.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::net::IpAddr;
use url::Url;

/// Accepted values of [`FieldType::ClassificationType`].
pub const CLASSIFICATION_TYPES: [&str; 20] = [
    "backdoor",
    "blacklist",
    "botnet drone",
    "brute-force",
    "c&c",
    "compromised",
    "ddos",
    "defacement",
    "dropzone",
    "exploit",
    "ids alert",
    "malware",
    "malware configuration",
    "phishing",
    "ransomware",
    "scanner",
    "spam",
    "test",
    "unknown",
    "vulnerable service",
];

const MAX_FQDN_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// The closed set of field type rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Free text without control characters.
    String,
    /// Text without control characters or uppercase letters.
    LowercaseString,
    /// Text without control characters or lowercase letters.
    UppercaseString,
    /// Absolute URL with a host.
    Url,
    /// Fully qualified domain name in lowercase, without a trailing dot.
    Fqdn,
    /// IPv4 or IPv6 address.
    IpAddress,
    /// IPv4 or IPv6 network in CIDR notation.
    IpNetwork,
    /// Standard base64 text.
    Base64,
    /// RFC 3339 timestamp.
    DateTime,
    /// Signed decimal integer.
    Integer,
    /// Finite decimal number.
    Float,
    /// `true` or `false`.
    Boolean,
    /// One of [`CLASSIFICATION_TYPES`].
    ClassificationType,
}

impl FieldType {
    /// Returns the type name used in harmonization documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::LowercaseString => "LowercaseString",
            Self::UppercaseString => "UppercaseString",
            Self::Url => "URL",
            Self::Fqdn => "FQDN",
            Self::IpAddress => "IPAddress",
            Self::IpNetwork => "IPNetwork",
            Self::Base64 => "Base64",
            Self::DateTime => "DateTime",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::ClassificationType => "ClassificationType",
        }
    }

    /// Returns `true` if `value` may be stored verbatim.
    #[must_use]
    pub fn validate(&self, value: &str) -> bool {
        if value.is_empty() || has_control(value) {
            return false;
        }
        match self {
            Self::String => true,
            Self::LowercaseString => !value.chars().any(char::is_uppercase),
            Self::UppercaseString => !value.chars().any(char::is_lowercase),
            Self::Url => !has_whitespace(value) && parse_url(value).is_some(),
            Self::Fqdn => is_fqdn(value),
            Self::IpAddress => value.parse::<IpAddr>().is_ok(),
            Self::IpNetwork => parse_network(value).is_some(),
            Self::Base64 => STANDARD.decode(value).is_ok(),
            Self::DateTime => DateTime::parse_from_rfc3339(value).is_ok(),
            Self::Integer => value.parse::<i64>().is_ok(),
            Self::Float => value.parse::<f64>().is_ok_and(f64::is_finite),
            Self::Boolean => matches!(value, "true" | "false"),
            Self::ClassificationType => CLASSIFICATION_TYPES.contains(&value),
        }
    }

    /// Normalises `value` into the canonical form of this type.
    ///
    /// Surrounding whitespace and control characters are always trimmed. The
    /// result still has to pass [`FieldType::validate`].
    #[must_use]
    pub fn sanitize(&self, value: &str) -> Option<String> {
        let trimmed = value.trim_matches(|c: char| c.is_whitespace() || c.is_control());
        match self {
            Self::String => Some(trimmed.to_owned()),
            Self::LowercaseString | Self::ClassificationType => Some(trimmed.to_lowercase()),
            Self::UppercaseString => Some(trimmed.to_uppercase()),
            Self::Url => parse_url(trimmed).map(String::from),
            Self::Fqdn => Some(trimmed.trim_end_matches('.').to_lowercase()),
            Self::IpAddress => trimmed.parse::<IpAddr>().ok().map(|ip| ip.to_string()),
            Self::IpNetwork => parse_network(trimmed).map(|(ip, prefix)| format!("{ip}/{prefix}")),
            Self::Base64 => Some(trimmed.chars().filter(|c| !c.is_whitespace()).collect()),
            Self::DateTime => parse_timestamp(trimmed)
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
            Self::Integer => trimmed.parse::<i64>().ok().map(|n| n.to_string()),
            Self::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| n.to_string()),
            Self::Boolean => sanitize_boolean(trimmed),
        }
    }
}

impl TryFrom<&str> for FieldType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "String" => Ok(Self::String),
            "LowercaseString" => Ok(Self::LowercaseString),
            "UppercaseString" => Ok(Self::UppercaseString),
            "URL" => Ok(Self::Url),
            "FQDN" => Ok(Self::Fqdn),
            "IPAddress" => Ok(Self::IpAddress),
            "IPNetwork" => Ok(Self::IpNetwork),
            "Base64" => Ok(Self::Base64),
            "DateTime" => Ok(Self::DateTime),
            "Integer" => Ok(Self::Integer),
            "Float" => Ok(Self::Float),
            "Boolean" => Ok(Self::Boolean),
            "ClassificationType" => Ok(Self::ClassificationType),
            other => Err(other.to_owned()),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Encodes a binary payload as the base64 text `raw` fields require.
///
/// # Examples
///
/// ```
/// use intelmsg::message::harmonization::encode_raw;
///
/// assert_eq!(encode_raw(b"lorem ipsum"), "bG9yZW0gaXBzdW0=");
/// ```
#[must_use]
pub fn encode_raw(payload: &[u8]) -> String {
    STANDARD.encode(payload)
}

fn has_control(value: &str) -> bool {
    value.chars().any(char::is_control)
}

fn has_whitespace(value: &str) -> bool {
    value.chars().any(char::is_whitespace)
}

fn parse_url(value: &str) -> Option<Url> {
    Url::parse(value).ok().filter(Url::has_host)
}

fn parse_network(value: &str) -> Option<(IpAddr, u8)> {
    let (address, prefix) = value.split_once('/')?;
    let ip = address.parse::<IpAddr>().ok()?;
    let length = prefix.parse::<u8>().ok()?;
    let max = if ip.is_ipv4() { 32 } else { 128 };
    (length <= max).then_some((ip, length))
}

fn is_fqdn(value: &str) -> bool {
    value.len() <= MAX_FQDN_LENGTH
        && !value.ends_with('.')
        && value.parse::<IpAddr>().is_err()
        && value.split('.').all(is_label)
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LENGTH
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn sanitize_boolean(value: &str) -> Option<String> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some("true".to_owned()),
        "false" | "no" | "0" => Some("false".to_owned()),
        _ => None,
    }
}
