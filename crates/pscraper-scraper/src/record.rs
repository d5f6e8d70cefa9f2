//! Field accessors for raw marketplace records.
//!
//! A JSON `null` is treated the same as an absent key throughout.

use pscraper_core::is_valid_vin;
use serde_json::{Map, Value};

use crate::error::RecordRejection;

pub(crate) type RawRecord = Map<String, Value>;

/// Keys that [`pscraper_core::VehicleListing`] stores in typed fields. Raw
/// keys with these names are dropped from `extra` to avoid duplicates when
/// the listing is flattened.
pub(crate) const SCHEMA_KEYS: [&str; 10] = [
    "vin",
    "listingId",
    "make",
    "model",
    "year",
    "trim",
    "mileage",
    "bodyStyle",
    "price",
    "seller",
];

pub(crate) fn into_object(raw: Value) -> Result<RawRecord, RecordRejection> {
    match raw {
        Value::Object(map) => Ok(map),
        _ => Err(RecordRejection::NotAnObject),
    }
}

/// Returns the raw record with schema keys removed.
pub(crate) fn into_extra(mut record: RawRecord) -> RawRecord {
    for key in SCHEMA_KEYS {
        record.remove(key);
    }
    record
}

pub(crate) fn present<'a>(record: &'a RawRecord, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|v| !v.is_null())
}

/// Strings pass through; numbers are rendered (ids are sometimes numeric).
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A required, non-empty text field.
pub(crate) fn required_text(
    record: &RawRecord,
    field: &'static str,
) -> Result<String, RecordRejection> {
    let text = present(record, field)
        .and_then(as_text)
        .ok_or(RecordRejection::MissingField { field })?;
    if text.is_empty() {
        return Err(RecordRejection::EmptyField { field });
    }
    Ok(text)
}

/// An optional text field; empty strings count as absent.
pub(crate) fn optional_text(record: &RawRecord, field: &str) -> Option<String> {
    present(record, field)
        .and_then(as_text)
        .filter(|s| !s.is_empty())
}

/// Parses an integer from a JSON number or a string with thousands
/// separators (`"12,345"`).
pub(crate) fn integer(field: &'static str, value: &Value) -> Result<i64, RecordRejection> {
    let invalid = || RecordRejection::InvalidNumber {
        field,
        value: value.to_string(),
    };
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(invalid),
        Value::String(s) => s.replace(',', "").trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Parses a decimal from a JSON number or a string such as `"$12,999.00"`.
pub(crate) fn decimal(field: &'static str, value: &Value) -> Result<f64, RecordRejection> {
    let invalid = || RecordRejection::InvalidNumber {
        field,
        value: value.to_string(),
    };
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(invalid),
        Value::String(s) => s
            .replace([',', '$'], "")
            .trim()
            .parse()
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// A required model year.
pub(crate) fn year(record: &RawRecord) -> Result<i32, RecordRejection> {
    let value = present(record, "year").ok_or(RecordRejection::MissingField { field: "year" })?;
    let year = integer("year", value)?;
    i32::try_from(year).map_err(|_| RecordRejection::InvalidNumber {
        field: "year",
        value: year.to_string(),
    })
}

pub(crate) fn check_vin(vin: &str) -> Result<(), RecordRejection> {
    if is_valid_vin(vin) {
        Ok(())
    } else {
        Err(RecordRejection::InvalidVin {
            len: vin.chars().count(),
        })
    }
}
