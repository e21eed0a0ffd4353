use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Attribute storage for one entity.
///
/// Keys are unique and kept in ascending order, which is also the order used
/// when an entity is dumped to disk.
pub type AttributeMap = BTreeMap<String, Value>;

/// Convert a decoded JSON document into an [`AttributeMap`].
///
/// Returns `None` when the document is not a JSON object.
pub fn attribute_map(document: Value) -> Option<AttributeMap> {
    match document {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}

/// A resolved attribute value.
///
/// Raw attributes are plain JSON. Reading one through the coercer may
/// upgrade it to a [`AttrValue::Timestamp`] when the raw scalar is an epoch
/// millisecond count or an ISO-8601 string with fractional seconds.
#[derive(Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Raw JSON, returned as stored.
    Json(Value),

    /// A temporal value recovered from a raw scalar.
    #[serde(serialize_with = "serialize_timestamp")]
    Timestamp(DateTime<Utc>),
}

impl AttrValue {
    /// Returns `true` for JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Json(Value::Null))
    }

    /// The raw JSON, if this value was not coerced.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            AttrValue::Json(v) => Some(v),
            AttrValue::Timestamp(_) => None,
        }
    }

    /// The string value if this is a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }

    /// The integer value if this is a JSON number representable as `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_json().and_then(Value::as_i64)
    }

    /// The float value if this is any JSON number.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_json().and_then(Value::as_f64)
    }

    /// The boolean value if this is a JSON bool.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_json().and_then(Value::as_bool)
    }

    /// The instant if this value was coerced to a timestamp.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            AttrValue::Timestamp(ts) => Some(*ts),
            AttrValue::Json(_) => None,
        }
    }

    /// Short name of the variant, used in type-mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Json(Value::Null) => "null",
            AttrValue::Json(Value::Bool(_)) => "bool",
            AttrValue::Json(Value::Number(_)) => "number",
            AttrValue::Json(Value::String(_)) => "string",
            AttrValue::Json(Value::Array(_)) => "array",
            AttrValue::Json(Value::Object(_)) => "object",
            AttrValue::Timestamp(_) => "timestamp",
        }
    }

    /// Convert back into JSON. Timestamps become RFC 3339 strings with
    /// microsecond precision, which the coercer reads back unchanged.
    pub fn into_json(self) -> Value {
        match self {
            AttrValue::Json(v) => v,
            AttrValue::Timestamp(ts) => Value::String(rfc3339(&ts)),
        }
    }
}

/// The one textual form of a timestamp: six fraction digits and a `Z`.
fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&rfc3339(ts))
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::Json(value)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(ts: DateTime<Utc>) -> Self {
        AttrValue::Timestamp(ts)
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Json(v) => write!(f, "Json({v})"),
            AttrValue::Timestamp(ts) => write!(f, "Timestamp({})", ts.to_rfc3339()),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Json(Value::String(s)) => f.write_str(s),
            AttrValue::Json(v) => write!(f, "{v}"),
            AttrValue::Timestamp(ts) => f.write_str(&rfc3339(ts)),
        }
    }
}
