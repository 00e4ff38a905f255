//! JSON codec shared by the persisted record types.
//!
//! Encoding is total: every field is always written, defaults included, so
//! `from_json(&to_json(x)) == x` for any record. Decoding treats each field as
//! optional but rejects the whole record if a present field has the wrong shape.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;

pub trait JsonCodec: Sized {
    /// Serialize with the fixed external field names.
    fn to_json(&self) -> String;

    /// Parse a record; absent fields keep their defaults.
    fn from_json(json: &str) -> Result<Self, DecodeError>;
}

/// Parse `json` as a single JSON object and deserialize it into `T`.
pub fn decode_object<T: DeserializeOwned>(json: &str) -> Result<T, DecodeError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| DecodeError::ParseFailure(e.to_string()))?;
    if !value.is_object() {
        return Err(DecodeError::InvalidField {
            field: "record",
            reason: format!("expected a JSON object, found {}", kind_of(&value)),
        });
    }
    serde_json::from_value(value).map_err(DecodeError::from)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
