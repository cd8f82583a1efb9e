//! Request validation subsystem.
//!
//! # Data Flow
//! ```text
//! raw body bytes
//!     → body.rs (JSON object or empty map)
//!     → fields.rs (required fields, ids, user ids)
//!     → products.rs (cart product lists, normalized)
//!     → typed values handed to the upstream client
//! ```
//!
//! # Design Decisions
//! - Messages are written for the caller to act on, with an example of the
//!   expected shape where one helps
//! - Numeric strings are accepted wherever an integer is, and coerced
//! - Nothing that fails coercion reaches the upstream client

pub mod body;
pub mod fields;
pub mod products;

use std::fmt;

use thiserror::Error;

pub use body::parse_request_body;
pub use fields::{validate_id, validate_required_field, validate_user_id, ResourceId};
pub use products::{validate_products, ProductIssues, ProductsPolicy};

/// Which resource an id refers to. Used to phrase id errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Cart,
    Product,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::Cart => f.write_str("Cart"),
            IdKind::Product => f.write_str("Product"),
        }
    }
}

/// Request validation failures. All of these map to HTTP 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The request body contains invalid JSON. Please ensure your request body is valid JSON format, for example: {{\"key\": \"value\"}}")]
    InvalidJson,

    #[error("The request body must be a JSON object with key-value pairs. Please provide data as: {{\"key\": \"value\"}} instead of arrays or other formats.")]
    NotAnObject,

    #[error("Missing required field: {field}. Example: {example}")]
    MissingField {
        field: &'static str,
        example: &'static str,
    },

    #[error("{0} ID is required. Please provide a valid ID as an integer (e.g., 1, 2, 3) or string (e.g., '1', '2', '3').")]
    MissingId(IdKind),

    #[error("{0} ID must be an integer or string. Please provide a valid ID like 1 or '1'.")]
    InvalidIdType(IdKind),

    #[error("User ID is required. Please provide userId as a non-negative integer (e.g., 1).")]
    MissingUserId,

    #[error("User ID must be an integer or a numeric string (e.g., 1 or '1').")]
    InvalidUserIdType,

    #[error("User ID must be a non-negative integer (e.g., 1 or '1').")]
    InvalidUserIdFormat,

    #[error("The 'products' field must be an array of product objects. Please provide products as: [{{\"id\": 1, \"quantity\": 2}}, {{\"id\": 2, \"quantity\": 1}}]")]
    InvalidProductsType,

    #[error("products[{0}] must be an object with an 'id' field, e.g. {{\"id\": 1, \"quantity\": 2}}")]
    InvalidProductFormat(usize),

    #[error("products[{0}] is missing the 'id' field")]
    MissingProductId(usize),

    #[error("products[{0}].id must be a non-negative integer (e.g., 1, 2, 3)")]
    InvalidProductId(usize),

    #[error("products[{0}].quantity must be an integer of 1 or greater")]
    InvalidQuantity(usize),

    #[error("There are issues with the products in your request. {0}")]
    InvalidProducts(ProductIssues),
}

/// Parse a JSON integer or an all-digit string as a non-negative integer.
pub(crate) fn coerce_unsigned(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) if is_numeric(s) => s.parse().ok(),
        _ => None,
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
