//! Request body parsing.

use serde_json::{Map, Value};

use super::ValidationError;

/// Parse a raw request body into a JSON object.
///
/// An empty body yields an empty map, so that missing-field errors are
/// reported instead of parse errors. Anything present must be a JSON object.
pub fn parse_request_body(bytes: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    if bytes.is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationError::NotAnObject),
        Err(_) => Err(ValidationError::InvalidJson),
    }
}
