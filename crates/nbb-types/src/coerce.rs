//! Smart value coercion.
//!
//! NodeBB reports times either as JavaScript epoch milliseconds (13-digit
//! integers or digit strings) or as ISO-8601 strings with fractional
//! seconds and a trailing `Z`. The coercer recognises exactly those two
//! shapes and turns them into `DateTime<Utc>`. Every other value is returned
//! as-is. Only top-level scalars are candidates; arrays and objects are never
//! inspected.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::value::AttrValue;

/// Length of an epoch-millisecond timestamp between 2001-09-09 and 2286-11-20.
pub const EPOCH_MILLIS_DIGITS: usize = 13;

/// Fixed part of `YYYY-MM-DDTHH:MM:SS.`; `0` marks a digit position.
const ISO_PREFIX: &[u8] = b"0000-00-00T00:00:00.";

/// Maximum number of fractional-second digits (strptime `%f`).
const MAX_FRACTION_DIGITS: usize = 6;

/// Coerce an attribute value.
///
/// Total, pure and idempotent: `coerce(coerce(v)) == coerce(v)`. A value that
/// is already a timestamp is returned unchanged.
pub fn coerce(value: AttrValue) -> AttrValue {
    match value {
        AttrValue::Json(raw) => match temporal(&raw) {
            Some(ts) => AttrValue::Timestamp(ts),
            None => AttrValue::Json(raw),
        },
        ts @ AttrValue::Timestamp(_) => ts,
    }
}

/// Coerce a raw JSON value read from an attribute map.
pub fn coerce_json(raw: &Value) -> AttrValue {
    match temporal(raw) {
        Some(ts) => AttrValue::Timestamp(ts),
        None => AttrValue::Json(raw.clone()),
    }
}

fn temporal(raw: &Value) -> Option<DateTime<Utc>> {
    let text = scalar_text(raw)?;
    if let Some(ts) = parse_epoch_millis(&text) {
        return Some(ts);
    }
    match raw {
        Value::String(s) => parse_iso_fraction(s),
        _ => None,
    }
}

/// Textual form of a scalar, the way it would be printed.
fn scalar_text(raw: &Value) -> Option<Cow<'_, str>> {
    match raw {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

fn parse_epoch_millis(text: &str) -> Option<DateTime<Utc>> {
    if text.len() != EPOCH_MILLIS_DIGITS || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let millis: i64 = text.parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

fn parse_iso_fraction(text: &str) -> Option<DateTime<Utc>> {
    let (last, body) = text.as_bytes().split_last()?;
    if *last != b'Z' || body.len() <= ISO_PREFIX.len() {
        return None;
    }
    let (prefix, fraction) = body.split_at(ISO_PREFIX.len());
    let prefix_ok = prefix
        .iter()
        .zip(ISO_PREFIX)
        .all(|(b, shape)| match *shape {
            b'0' => b.is_ascii_digit(),
            _ => *b == *shape,
        });
    if !prefix_ok
        || fraction.len() > MAX_FRACTION_DIGITS
        || !fraction.iter().all(u8::is_ascii_digit)
    {
        return None;
    }
    // `Z` is ASCII, so dropping the last byte stays on a char boundary.
    let naive = NaiveDateTime::parse_from_str(&text[..body.len()], "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}
