//! Cart product list validation.
//!
//! Two policies exist. `FailFast` stops at the first bad element and names it
//! by index. `Aggregate` walks the whole list and reports every category of
//! problem found in one message.

use std::fmt;

use serde_json::Value;

use super::{coerce_unsigned, ValidationError};
use crate::upstream::CartProductRef;

const FORMAT_GUIDANCE: &str = "Please ensure all products follow this format: {\"id\": 1, \"quantity\": 2} where 'id' is a non-negative integer and 'quantity' is optional but must be 1 or greater if provided.";

/// How `validate_products` reports bad elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductsPolicy {
    FailFast,
    Aggregate,
}

/// Problem categories found in a product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductIssues {
    pub not_object: bool,
    pub missing_id: bool,
    pub invalid_id: bool,
    pub invalid_quantity: bool,
}

impl ProductIssues {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn merge(&mut self, other: ProductIssues) {
        self.not_object |= other.not_object;
        self.missing_id |= other.missing_id;
        self.invalid_id |= other.invalid_id;
        self.invalid_quantity |= other.invalid_quantity;
    }

    /// The single error reported for one element under `FailFast`.
    fn first_error(&self, index: usize) -> ValidationError {
        if self.not_object {
            ValidationError::InvalidProductFormat(index)
        } else if self.missing_id {
            ValidationError::MissingProductId(index)
        } else if self.invalid_id {
            ValidationError::InvalidProductId(index)
        } else {
            ValidationError::InvalidQuantity(index)
        }
    }
}

impl fmt::Display for ProductIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.not_object {
            f.write_str("Some products are not properly formatted. Each product must be an object with an 'id' field. ")?;
        }
        if self.missing_id || self.invalid_id {
            f.write_str("Some products have invalid IDs. Product IDs must be non-negative integers (e.g., 1, 2, 3). ")?;
        }
        if self.invalid_quantity {
            f.write_str("Some products have invalid quantities. Quantities must be positive integers (1 or greater). ")?;
        }
        f.write_str(FORMAT_GUIDANCE)
    }
}

/// Validate and normalize a cart's product list.
pub fn validate_products(
    value: &Value,
    policy: ProductsPolicy,
) -> Result<Vec<CartProductRef>, ValidationError> {
    let items = value.as_array().ok_or(ValidationError::InvalidProductsType)?;

    let mut products = Vec::with_capacity(items.len());
    let mut issues = ProductIssues::default();

    for (index, item) in items.iter().enumerate() {
        match check_product(item) {
            Ok(product) => products.push(product),
            Err(found) => match policy {
                ProductsPolicy::FailFast => return Err(found.first_error(index)),
                ProductsPolicy::Aggregate => issues.merge(found),
            },
        }
    }

    if issues.is_empty() {
        Ok(products)
    } else {
        Err(ValidationError::InvalidProducts(issues))
    }
}

fn check_product(item: &Value) -> Result<CartProductRef, ProductIssues> {
    let mut issues = ProductIssues::default();

    let Some(fields) = item.as_object() else {
        issues.not_object = true;
        return Err(issues);
    };

    let id = match fields.get("id") {
        None => {
            issues.missing_id = true;
            None
        }
        Some(raw) => {
            let id = coerce_unsigned(raw);
            issues.invalid_id = id.is_none();
            id
        }
    };

    let quantity = match fields.get("quantity") {
        None => None,
        Some(raw) => {
            let quantity = coerce_unsigned(raw).filter(|q| *q >= 1);
            issues.invalid_quantity = quantity.is_none();
            quantity
        }
    };

    match id {
        Some(id) if issues.is_empty() => Ok(CartProductRef { id, quantity }),
        _ => Err(issues),
    }
}
