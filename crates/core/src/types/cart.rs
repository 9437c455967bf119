//! The client-local shopping cart data model.
//!
//! A [`Cart`] is an ordered sequence of [`LineItem`]s, unique by product id.
//! Insertion order is preserved for display purposes only. All mutations here
//! are pure in-memory transforms; persistence is the client crate's concern.
//!
//! # Invariants
//!
//! - Every stored line has `quantity >= 1`; an update that would drive a
//!   quantity to zero removes the line instead.
//! - No two lines share a product id. Adding an already-present product merges
//!   into the existing line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::product::Product;

/// One product entry in the cart.
///
/// Line items snapshot the product's `name`, `price`, and `description` at
/// the time of the first add. Repeat adds increment the quantity but do not
/// refresh the snapshot, so a catalog price change after the first add is not
/// reflected in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier.
    pub id: ProductId,
    /// Product name at the time of the first add.
    pub name: String,
    /// Unit price at the time of the first add.
    pub price: Decimal,
    /// Product description at the time of the first add.
    #[serde(default)]
    pub description: String,
    /// Units of this product in the cart. Always at least 1.
    pub quantity: u32,
}

impl LineItem {
    /// The price contribution of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The full ordered set of line items for one client.
///
/// Serializes as a bare JSON array of line items, which is the persisted blob
/// layout used by the cart store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up the line for a product id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the cart holds a line for this product id.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` units of a product.
    ///
    /// If a line for the product already exists, its quantity is incremented
    /// (saturating) and its name/price/description snapshot is left untouched.
    /// Otherwise a new line is appended. Adding zero units of an absent
    /// product is a no-op, since a stored line must have `quantity >= 1`.
    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else if quantity > 0 {
            self.items.push(LineItem {
                id: product.id,
                name: product.name.clone(),
                price: product.price,
                description: product.description.clone(),
                quantity,
            });
        }
    }

    /// Remove the line for a product id. No-op if the product is absent.
    pub fn remove_item(&mut self, id: ProductId) {
        self.items.retain(|item| item.id != id);
    }

    /// Set the quantity for a product already in the cart.
    ///
    /// A quantity of zero removes the line. The call is a no-op if the
    /// product is absent; it never creates a line.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
        }
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all lines. Zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities over all lines. Zero for an empty cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
