//! Encoding and decoding of stored setting values.
//!
//! Every value is stored as text next to a [`DeclaredType`] tag. Both tags are
//! written as JSON, so a plain string lands in the table wrapped in quotes.
//! Decoding never fails: text that does not parse degrades to the raw string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a stored value should be interpreted.
///
/// The tag describes the encoding, not what the value means to a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    String,
    Json,
}

impl DeclaredType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Json => "json",
        }
    }

    /// Interpret a type tag read back from storage.
    ///
    /// The table does not constrain the tag, so unknown tags are treated as
    /// `string`, which is the most forgiving decode path.
    pub fn from_stored(tag: &str) -> Self {
        match tag.parse() {
            Ok(declared) => declared,
            Err(_) => {
                tracing::warn!(tag, "Unknown setting type, treating as string");
                Self::String
            }
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclaredType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "json" => Ok(Self::Json),
            other => Err(CodecError::UnknownType(other.to_string())),
        }
    }
}

/// Errors raised while preparing a value for storage.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Unknown setting type: {0}")]
    UnknownType(String),
    #[error("Failed to serialize setting value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Decode a stored value according to its declared type.
///
/// Never fails. Malformed input comes back as [`Value::String`] holding the
/// stored text unchanged; callers decide whether that shape is acceptable.
pub fn decode(raw: &str, declared: DeclaredType) -> Value {
    match declared {
        DeclaredType::Json => decode_json(raw),
        DeclaredType::String => decode_string(raw),
    }
}

fn decode_json(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Stored JSON setting is malformed, using raw text");
            Value::String(raw.to_string())
        }
    }
}

/// String settings have been written both JSON-quoted and as bare text.
/// The quoted form is tried first; anything else is legacy text kept verbatim.
fn decode_string(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw.to_string()),
    }
}

/// Encode a value for storage under `declared`.
///
/// Both types are serialized as JSON so that [`decode`] reads them back
/// through its JSON-first path.
pub fn encode(value: &Value, declared: DeclaredType) -> String {
    match declared {
        DeclaredType::String | DeclaredType::Json => value.to_string(),
    }
}

/// Encode any serializable value for storage under `declared`.
pub fn encode_typed<T: Serialize + ?Sized>(
    value: &T,
    declared: DeclaredType,
) -> Result<String, CodecError> {
    let value = serde_json::to_value(value)?;
    Ok(encode(&value, declared))
}
