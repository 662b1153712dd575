//! Field decoders for the loosely typed search response.
//!
//! The upstream serialises the same field as a string on one page and a number
//! on the next, and uses `null` and `""` interchangeably for "absent". These
//! helpers accept those encodings at the boundary so the public types can stay
//! strict.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

use super::{Listing, SearchSummary};

fn value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    Value::deserialize(deserializer)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Required string, trimmed.
pub(super) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match value(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string, found {}",
            kind(&other)
        ))),
    }
}

/// Optional string where `null` means empty.
pub(super) fn text_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    match value(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.trim().to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or null, found {}",
            kind(&other)
        ))),
    }
}

/// Nullable string; blank collapses to `None`.
pub(super) fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let text = text_or_empty(deserializer)?;
    Ok((!text.is_empty()).then_some(text))
}

fn scalar_string(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Opaque identifier: string or number, never blank.
pub(super) fn job_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = value(deserializer)?;
    let described = kind(&raw);
    match scalar_string(raw) {
        Some(id) if !id.is_empty() => Ok(id),
        Some(_) => Err(D::Error::custom("Jobid must not be empty")),
        None => Err(D::Error::custom(format!(
            "expected Jobid as a string or number, found {described}"
        ))),
    }
}

/// Status sentinel: `"1"` and `1` are the same thing.
pub(super) fn status_code<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    let raw = value(deserializer)?;
    let described = kind(&raw);
    scalar_string(raw).ok_or_else(|| {
        D::Error::custom(format!(
            "expected statuscode as a string or number, found {described}"
        ))
    })
}

pub(super) fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match value(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(D::Error::custom(format!("expected 0 or 1, found {n}"))),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            other => Err(D::Error::custom(format!(
                "expected a boolean, found {other:?}"
            ))),
        },
        other => Err(D::Error::custom(format!(
            "expected a boolean, found {}",
            kind(&other)
        ))),
    }
}

pub(super) fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match value(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("expected an integer, found {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected an integer, found {s:?}"))),
        other => Err(D::Error::custom(format!(
            "expected an integer, found {}",
            kind(&other)
        ))),
    }
}

pub(super) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let n = integer(deserializer)?;
    u64::try_from(n).map_err(|_| D::Error::custom(format!("expected a non-negative count, found {n}")))
}

/// Parse the timestamp shapes seen in `deadlineDB` and `publishDate`.
/// Offsets are dropped and the wall-clock time kept as published.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

pub(super) fn timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    match value(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unrecognised timestamp {s:?}"))),
        other => Err(D::Error::custom(format!(
            "expected a timestamp string, found {}",
            kind(&other)
        ))),
    }
}

pub(super) fn listings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Listing>, D::Error> {
    Ok(Option::<Vec<Listing>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(super) fn summary<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<SearchSummary, D::Error> {
    Ok(Option::<SearchSummary>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2025-03-14T09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-14 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-14T09:30:00+06:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2025-03-14T09:30:00.000 "), Some(expected));
        assert_eq!(
            parse_timestamp("2025-03-14"),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_prose() {
        assert!(parse_timestamp("14 Mar 2025").is_none());
        assert!(parse_timestamp("soon").is_none());
    }
}
