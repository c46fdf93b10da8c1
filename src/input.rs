//! Byte adapter for the transport shapes a host may hand over.
//!
//! A file picker bridge can deliver the template as raw bytes, as a
//! serialized buffer (`{"type":"Buffer","data":[…]}`), as a length-indexed
//! object (`{"0":80,"1":75,…,"length":N}`), as a JSON byte array or as
//! base64 text. Everything else is [`Error::UnsupportedInputShape`].

use crate::error::{Error, Result};
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static BASE64_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/=]+$").unwrap());

/// Keys of an open response tried in order.
const RESPONSE_KEYS: &[&str] = &["bytes", "buffer", "base64"];

/// A template as received from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputShape {
    /// Raw bytes
    Bytes(Vec<u8>),
    /// A JSON value: buffer object, indexed object, byte array or base64 string
    Json(Value),
    /// Base64 text
    Base64(String),
}

impl InputShape {
    /// Decode the shape into bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use manualdoc::input::InputShape;
    /// use serde_json::json;
    ///
    /// let shape = InputShape::Json(json!({"type": "Buffer", "data": [80, 75, 3, 4]}));
    /// assert_eq!(shape.to_bytes()?, vec![80, 75, 3, 4]);
    ///
    /// let shape = InputShape::Json(json!({"0": 80, "1": 75, "length": 2}));
    /// assert_eq!(shape.to_bytes()?, vec![80, 75]);
    /// # Ok::<(), manualdoc::Error>(())
    /// ```
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            InputShape::Bytes(bytes) => Ok(bytes.clone()),
            InputShape::Base64(text) => decode_base64(text),
            InputShape::Json(value) => bytes_from_json(value),
        }
    }

    /// Pick the template out of an open response (`bytes`, then `buffer`,
    /// then `base64`).
    pub fn from_response(response: &Value) -> Result<Self> {
        RESPONSE_KEYS
            .iter()
            .filter_map(|key| response.get(*key))
            .find(|value| bytes_from_json(value).is_ok())
            .map(|value| InputShape::Json(value.clone()))
            .ok_or_else(|| Error::UnsupportedInputShape("no usable template bytes in response".to_string()))
    }
}

fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    if !BASE64_TEXT.is_match(text) {
        return Err(Error::UnsupportedInputShape("text is not base64".to_string()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .map_err(|e| Error::UnsupportedInputShape(format!("invalid base64: {}", e)))
}

fn byte(value: &Value) -> Result<u8> {
    value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| Error::UnsupportedInputShape(format!("not a byte: {}", value)))
}

fn byte_array(items: &[Value]) -> Result<Vec<u8>> {
    items.iter().map(byte).collect()
}

/// `{"0":…,"1":…,"length":N}`; missing indices read as 0.
fn indexed_object(map: &Map<String, Value>) -> Option<Result<Vec<u8>>> {
    let looks_indexed = !map.is_empty()
        && map
            .keys()
            .all(|k| k == "length" || (!k.is_empty() && k.bytes().all(|b| b.is_ascii_digit())));
    if !looks_indexed {
        return None;
    }

    let len = match map.get("length") {
        Some(v) => match v.as_u64() {
            Some(n) => n as usize,
            None => return Some(Err(Error::UnsupportedInputShape("bad length".to_string()))),
        },
        None => map.len(),
    };
    // Every index needs at most one entry; anything longer is padding.
    if len > map.len() {
        return Some(Err(Error::UnsupportedInputShape(format!(
            "length {} exceeds {} entries",
            len,
            map.len()
        ))));
    }

    Some(
        (0..len)
            .map(|i| map.get(&i.to_string()).map(byte).unwrap_or(Ok(0)))
            .collect(),
    )
}

/// Decode a JSON transport shape into bytes.
pub fn bytes_from_json(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Array(items) => byte_array(items),
        Value::String(text) => decode_base64(text),
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("Buffer") {
                if let Some(Value::Array(items)) = map.get("data") {
                    return byte_array(items);
                }
            }
            indexed_object(map).unwrap_or_else(|| {
                Err(Error::UnsupportedInputShape("unrecognized object".to_string()))
            })
        }
        other => Err(Error::UnsupportedInputShape(format!(
            "unsupported JSON value: {}",
            kind_name(other)
        ))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
