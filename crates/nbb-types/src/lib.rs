//! Value model for the NodeBB client.
//!
//! Every entity attribute is drawn from the schema-less JSON value model
//! (`serde_json::Value`). Reading an attribute runs it through the smart
//! coercer, which turns raw scalars that look like timestamps into
//! structured temporal values and leaves everything else untouched.
//!
//! # Key Types
//!
//! - [`AttrValue`]: a resolved attribute: raw JSON or a UTC timestamp
//! - [`AttributeMap`]: the key/value store backing one entity
//! - [`coerce`] / [`coerce_json`]: the pure, idempotent coercion function

pub mod coerce;
pub mod value;

pub use coerce::{coerce, coerce_json, EPOCH_MILLIS_DIGITS};
pub use value::{attribute_map, AttrValue, AttributeMap};

/// Re-exported so downstream crates share one JSON value type.
pub use serde_json::Value;
