//! The client-local cart store.
//!
//! [`CartStore`] owns the authoritative cart state for one client and its
//! persisted representation: a JSON array of line items stored under a single
//! key in a [`KeyValueStore`]. Every mutating operation reads current state,
//! applies the change in memory, and writes the full state back before
//! returning, so the persisted blob and the returned cart always agree.
//!
//! Mutations are atomic with respect to the single-threaded caller only.
//! Nothing coordinates two processes sharing one storage file; the last
//! writer wins, and that lost-update race is an accepted limitation of the
//! store's contract.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use starfruit_core::{Cart, Product, ProductId};

use crate::storage::{KeyValueStore, StorageError};

/// Storage key used when none is configured.
pub const DEFAULT_CART_KEY: &str = "shopping_cart";

/// Errors that can occur when reading or writing the persisted cart.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted blob exists but is not a valid cart.
    #[error("corrupt cart blob: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// The cart could not be serialized for persistence.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// The client-local shopping cart, backed by key-value storage.
///
/// The store is constructed explicitly and injected wherever cart access is
/// needed; its lifetime is owned by the application shell.
///
/// # Example
///
/// ```rust
/// use starfruit_client::cart::CartStore;
/// use starfruit_client::storage::MemoryStore;
/// use starfruit_core::{Product, ProductId};
///
/// let store = CartStore::with_default_key(MemoryStore::new());
/// let laptop = Product::new(
///     ProductId::new(1),
///     "Laptop".to_string(),
///     "1299.00".parse().unwrap(),
///     String::new(),
/// );
/// let cart = store.add_item(&laptop, 2).unwrap();
/// assert_eq!(cart.item_count(), 2);
/// ```
pub struct CartStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a cart store persisting under the given storage key.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Create a cart store persisting under [`DEFAULT_CART_KEY`].
    pub fn with_default_key(storage: S) -> Self {
        Self::new(storage, DEFAULT_CART_KEY)
    }

    /// Read the persisted cart, treating failures as an empty cart.
    ///
    /// A missing key is the implicit empty cart of a client that has never
    /// added an item. Storage failures and malformed blobs also yield an
    /// empty cart, but are logged at `warn`; use [`Self::load`] to surface
    /// them instead.
    #[must_use]
    pub fn cart(&self) -> Cart {
        match self.load() {
            Ok(cart) => cart,
            Err(CartStoreError::Corrupt(err)) => {
                warn!(key = %self.key, error = %err, "Persisted cart is corrupt; treating as empty");
                Cart::new()
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Failed to read persisted cart; treating as empty");
                Cart::new()
            }
        }
    }

    /// Read the persisted cart, surfacing storage failures and corruption.
    ///
    /// A missing key still yields an empty cart; that is the store's
    /// lifecycle, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Storage`] if the backend cannot be read and
    /// [`CartStoreError::Corrupt`] if the stored blob is not a valid cart.
    pub fn load(&self) -> Result<Cart, CartStoreError> {
        match self.storage.get(&self.key)? {
            Some(blob) => serde_json::from_str(&blob).map_err(CartStoreError::Corrupt),
            None => Ok(Cart::new()),
        }
    }

    /// Persist the given cart as the full new state.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn save(&self, cart: &Cart) -> Result<(), CartStoreError> {
        let blob = serde_json::to_string(cart).map_err(CartStoreError::Serialize)?;
        self.storage.set(&self.key, &blob)?;
        debug!(key = %self.key, lines = cart.len(), "Persisted cart");
        Ok(())
    }

    /// Add `quantity` units of a product and persist the updated cart.
    ///
    /// If the product is already present its quantity is incremented and its
    /// name/price/description snapshot is left untouched; otherwise a new
    /// line is appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&self, product: &Product, quantity: u32) -> Result<Cart, CartStoreError> {
        let mut cart = self.cart();
        cart.add_item(product, quantity);
        self.save(&cart)?;
        Ok(cart)
    }

    /// Remove the line for a product id and persist the updated cart.
    ///
    /// A no-op, not an error, if the product is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove_item(&self, id: ProductId) -> Result<Cart, CartStoreError> {
        let mut cart = self.cart();
        cart.remove_item(id);
        self.save(&cart)?;
        Ok(cart)
    }

    /// Set the quantity for a product and persist the updated cart.
    ///
    /// A quantity of zero removes the line. A no-op if the product is absent;
    /// no line is created.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, id: ProductId, quantity: u32) -> Result<Cart, CartStoreError> {
        let mut cart = self.cart();
        cart.update_quantity(id, quantity);
        self.save(&cart)?;
        Ok(cart)
    }

    /// Persist an empty cart. The storage key remains present.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), CartStoreError> {
        self.save(&Cart::new())
    }

    /// Sum of `price * quantity` over the persisted cart.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart().total()
    }

    /// Sum of quantities over the persisted cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart().item_count()
    }
}
