//! Integration tests for cart persistence through file-backed storage.

#![allow(clippy::unwrap_used)]

use std::fs;

use rust_decimal::Decimal;
use tempfile::tempdir;

use starfruit_client::cart::{CartStore, CartStoreError, DEFAULT_CART_KEY};
use starfruit_client::storage::{JsonFileStore, KeyValueStore};
use starfruit_core::{Cart, Product, ProductId};

use starfruit_integration_tests::init_test_logging;

fn product(id: i64, name: &str, price: &str) -> Product {
    Product::new(
        ProductId::new(id),
        name.to_string(),
        price.parse().unwrap(),
        format!("{name} description"),
    )
}

#[test]
fn test_cart_round_trips_across_store_handles() {
    init_test_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("starfruit-store.json");

    {
        let store = CartStore::with_default_key(JsonFileStore::new(&path));
        store.add_item(&product(1, "Laptop", "1299.00"), 2).unwrap();
        store.add_item(&product(2, "Headphones", "399.00"), 1).unwrap();
    }

    // A fresh handle over the same file sees the same cart.
    let reopened = CartStore::with_default_key(JsonFileStore::new(&path));
    let cart = reopened.cart();

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), "2997.00".parse::<Decimal>().unwrap());
}

#[test]
fn test_full_shopping_scenario_on_disk() {
    init_test_logging();
    let dir = tempdir().unwrap();
    let store = CartStore::with_default_key(JsonFileStore::new(dir.path().join("store.json")));

    assert!(store.cart().is_empty());

    store.add_item(&product(1, "A", "9.99"), 2).unwrap();
    store.add_item(&product(2, "B", "4.5"), 1).unwrap();
    assert_eq!(store.total(), "24.48".parse::<Decimal>().unwrap());

    store.remove_item(ProductId::new(1)).unwrap();
    assert_eq!(store.item_count(), 1);

    store.clear().unwrap();
    assert!(store.cart().is_empty());
    assert_eq!(store.total(), Decimal::ZERO);
}

#[test]
fn test_clear_keeps_storage_key_present() {
    init_test_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = CartStore::with_default_key(JsonFileStore::new(&path));

    store.add_item(&product(1, "A", "1.00"), 1).unwrap();
    store.clear().unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let map: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(map[DEFAULT_CART_KEY], "[]");
}

#[test]
fn test_corrupt_cart_value_is_soft_empty_and_strict_error() {
    init_test_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    // A valid store file whose cart value is not a valid cart.
    fs::write(
        &path,
        format!(r#"{{"{DEFAULT_CART_KEY}": "{{not a cart"}}"#),
    )
    .unwrap();

    let store = CartStore::with_default_key(JsonFileStore::new(&path));
    assert!(store.cart().is_empty());
    assert!(matches!(store.load(), Err(CartStoreError::Corrupt(_))));
}

#[test]
fn test_cart_and_tokens_share_one_storage_file() {
    init_test_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    let storage = JsonFileStore::new(&path);
    let cart_store = CartStore::with_default_key(storage.clone());

    storage.set("access_token", "tok-access").unwrap();
    cart_store.add_item(&product(1, "A", "1.00"), 1).unwrap();

    // Cart writes do not clobber sibling keys.
    assert_eq!(storage.get("access_token").unwrap().as_deref(), Some("tok-access"));
    assert_eq!(cart_store.item_count(), 1);
}
