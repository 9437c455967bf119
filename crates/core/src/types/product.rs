//! Product catalog records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// A product as served by the gateway catalog.
///
/// This is also the input shape for cart additions; the cart snapshots the
/// `name`, `price`, and `description` fields as given, without validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the shop currency.
    pub price: Decimal,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Units in stock, when the catalog reports it. Ignored by the cart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl Product {
    /// Create a product record with no stock information.
    #[must_use]
    pub const fn new(id: ProductId, name: String, price: Decimal, description: String) -> Self {
        Self {
            id,
            name,
            price,
            description,
            stock: None,
        }
    }
}
