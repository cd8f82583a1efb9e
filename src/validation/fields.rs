//! Field-level validators for cart and product requests.

use std::fmt;

use serde_json::{Map, Value};

use super::{coerce_unsigned, IdKind, ValidationError};

/// A cart or product id as the caller supplied it.
///
/// Ids are relayed to the upstream API unchanged, so both integer and string
/// forms are kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceId {
    Int(i64),
    Text(String),
}

impl ResourceId {
    /// Build an id from a URL path segment, preferring the integer form.
    pub fn from_segment(segment: &str) -> Self {
        match segment.parse::<i64>() {
            Ok(n) => ResourceId::Int(n),
            Err(_) => ResourceId::Text(segment.to_string()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

/// Fail unless `field` is a key of `body`.
pub fn validate_required_field(
    body: &Map<String, Value>,
    field: &'static str,
    example: &'static str,
) -> Result<(), ValidationError> {
    if body.contains_key(field) {
        Ok(())
    } else {
        Err(ValidationError::MissingField { field, example })
    }
}

/// Accept an integer or string id and pass it through unchanged.
pub fn validate_id(value: Option<&Value>, kind: IdKind) -> Result<ResourceId, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingId(kind)),
        Some(Value::String(s)) => Ok(ResourceId::Text(s.clone())),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(ResourceId::Int(i)),
            // Integers past i64 are still integers; relay their digits.
            None if n.is_u64() => Ok(ResourceId::Text(n.to_string())),
            None => Err(ValidationError::InvalidIdType(kind)),
        },
        Some(_) => Err(ValidationError::InvalidIdType(kind)),
    }
}

/// Coerce a user id from an integer or numeric string.
pub fn validate_user_id(value: Option<&Value>) -> Result<u64, ValidationError> {
    let value = match value {
        None | Some(Value::Null) => return Err(ValidationError::MissingUserId),
        Some(v) => v,
    };

    match value {
        Value::Number(n) if n.is_u64() || n.is_i64() => {
            coerce_unsigned(value).ok_or(ValidationError::InvalidUserIdFormat)
        }
        Value::String(_) => coerce_unsigned(value).ok_or(ValidationError::InvalidUserIdFormat),
        _ => Err(ValidationError::InvalidUserIdType),
    }
}
