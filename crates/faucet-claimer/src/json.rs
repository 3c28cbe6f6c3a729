//! JSON decoding that only accepts top-level objects.

use crate::error::ClaimerResult;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

/// Decode `bytes` into `T`, rejecting anything but a JSON object.
///
/// Derived struct decoders also accept arrays (fields filled by position),
/// so the shape is checked on the raw value first.
pub fn decode_object<T: DeserializeOwned>(bytes: &[u8]) -> ClaimerResult<T> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(serde_json::Error::custom(format!(
            "expected a JSON object, found {}",
            kind(&value)
        ))
        .into());
    }
    Ok(serde_json::from_value(value)?)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
