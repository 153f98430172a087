//! ISO local date-time wire format for note timestamps.
//!
//! Written as `%Y-%m-%dT%H:%M:%S%.f`. Reads also accept minute precision,
//! which some producers emit when the seconds component is zero.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const READ_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Current local wall-clock time without zone information.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Formats a timestamp in the persisted ISO local date-time form.
pub fn format(value: &NaiveDateTime) -> String {
    value.format(WRITE_FORMAT).to_string()
}

/// Parses a persisted ISO local date-time string.
pub fn parse(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    READ_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid ISO local date-time `{raw}`"))
    })
}
