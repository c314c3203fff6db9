//! Lenient coercion of provider JSON fields.
//!
//! Providers send prices either as JSON numbers or as numeric-looking strings
//! (Binance quotes everything as text). Both become `Decimal` without passing
//! through `f64`, so nothing is lost on the way in.

use crate::error::MalformedDataError;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Read a required decimal field.
pub fn decimal(field: &str, value: Option<&Value>) -> Result<Decimal, MalformedDataError> {
    match value {
        None | Some(Value::Null) => Err(MalformedDataError::MissingField(field.to_string())),
        Some(v) => parse_decimal(v).ok_or_else(|| not_numeric(field, v)),
    }
}

/// Read an optional decimal field. Absent and `null` are `None`; present but
/// non-numeric is still an error.
pub fn optional_decimal(
    field: &str,
    value: Option<&Value>,
) -> Result<Option<Decimal>, MalformedDataError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse_decimal(v)
            .map(Some)
            .ok_or_else(|| not_numeric(field, v)),
    }
}

/// Read a required epoch-millisecond timestamp.
pub fn timestamp_ms(field: &str, value: Option<&Value>) -> Result<i64, MalformedDataError> {
    let v = match value {
        None | Some(Value::Null) => {
            return Err(MalformedDataError::MissingField(field.to_string()))
        }
        Some(v) => v,
    };

    let parsed = match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| not_numeric(field, v))
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn not_numeric(field: &str, value: &Value) -> MalformedDataError {
    MalformedDataError::NotNumeric {
        field: field.to_string(),
        value: value.to_string(),
    }
}
