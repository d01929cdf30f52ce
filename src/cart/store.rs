//! Persistent cart store
//!
//! [`CartStore`] is the single handle through which a session mutates its cart.
//! Every mutation rewrites the whole serialised cart to storage. Storage faults
//! are logged and swallowed: the in-memory cart stays authoritative and a
//! missing or corrupt document loads as an empty cart.
//!
//! Concurrent writers sharing one storage key are not coordinated; the last
//! write wins. [`CartStore::reload`] re-reads storage when a caller knows the
//! key changed underneath it.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    cart::{
        Cart, CartLineItem, ProductSnapshot,
        storage::{Storage, StorageError},
    },
    ids::ProductId,
};

/// Well-known storage key for the serialised cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// A cart bound to the storage it persists to.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    key: String,
}

impl<S: Storage> CartStore<S> {
    /// Restore the cart persisted under [`CART_STORAGE_KEY`].
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, CART_STORAGE_KEY)
    }

    /// Restore the cart persisted under a custom key.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = load_cart(&storage, &key);

        Self { cart, storage, key }
    }

    /// Discard in-memory state and read the cart back from storage.
    pub fn reload(&mut self) {
        self.cart = load_cart(&self.storage, &self.key);
    }

    /// Add `requested` units of a product. See [`Cart::add_item`].
    pub fn add_item(&mut self, product: ProductSnapshot, requested: u32) {
        self.cart.add_item(product, requested);
        self.persist();
    }

    /// Remove a product's line.
    pub fn remove_item(&mut self, product: &ProductId) {
        self.cart.remove_item(product);
        self.persist();
    }

    /// Add one unit of a product, up to its stock ceiling.
    pub fn increment_qty(&mut self, product: &ProductId) {
        self.cart.increment_qty(product);
        self.persist();
    }

    /// Take one unit of a product away, removing the line at zero.
    pub fn decrement_qty(&mut self, product: &ProductId) {
        self.cart.decrement_qty(product);
        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Cart total in paise.
    pub fn total(&self) -> u64 {
        self.cart.total()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Units of a product in the cart, 0 when absent.
    pub fn quantity_of(&self, product: &ProductId) -> u32 {
        self.cart.quantity_of(product)
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The storage backend, mutably. Writes made through it are only observed
    /// after [`CartStore::reload`].
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give the storage backend back, dropping the in-memory cart.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        if let Err(error) = save_cart(&mut self.storage, &self.key, &self.cart) {
            warn!(key = %self.key, %error, "failed to persist cart");
        }
    }
}

/// Read a cart from storage. Never fails: unreadable state is an empty cart.
pub fn load_cart<S: Storage + ?Sized>(storage: &S, key: &str) -> Cart {
    match storage.get(key) {
        Ok(Some(raw)) => decode_cart(&raw),
        Ok(None) => Cart::new(),
        Err(error) => {
            warn!(%key, %error, "cart storage unreadable; starting with an empty cart");

            Cart::new()
        }
    }
}

/// Serialise the whole cart under `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if serialisation or the storage write fails.
pub fn save_cart<S: Storage + ?Sized>(
    storage: &mut S,
    key: &str,
    cart: &Cart,
) -> Result<(), StorageError> {
    let encoded = serde_json::to_string(cart.lines())
        .map_err(|error| StorageError::Unavailable(error.to_string()))?;

    storage.set(key, &encoded)
}

/// Decode a persisted cart document line by line.
///
/// Lines that no longer decode (older or newer schema) are dropped on their
/// own; a document that is not an array yields an empty cart.
pub fn decode_cart(raw: &str) -> Cart {
    let values: Vec<Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(error) => {
            warn!(%error, "persisted cart is not a line array; starting with an empty cart");

            return Cart::new();
        }
    };

    let mut cart = Cart::new();

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<CartLineItem>(value) {
            Ok(line) => cart.restore_line(line),
            Err(error) => warn!(index, %error, "dropping unreadable cart line"),
        }
    }

    debug!(lines = cart.len(), "restored cart");

    cart
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::cart::{storage::MemoryStorage, tests::snapshot};

    #[derive(Debug, Default)]
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }
    }

    #[test]
    fn missing_storage_loads_empty() {
        let store = CartStore::load(MemoryStorage::new());

        assert!(store.cart().is_empty());
    }

    #[test]
    fn corrupt_storage_loads_empty() {
        let store = CartStore::load(MemoryStorage::with_entry(CART_STORAGE_KEY, "{not json"));

        assert!(store.cart().is_empty());
    }

    #[test]
    fn non_array_document_loads_empty() {
        let store = CartStore::load(MemoryStorage::with_entry(
            CART_STORAGE_KEY,
            r#"{"productId":"p1"}"#,
        ));

        assert!(store.cart().is_empty());
    }

    #[test]
    fn unreadable_and_unwritable_storage_never_raises() {
        let mut store = CartStore::load(BrokenStorage);

        store.add_item(snapshot("p1", "s1", 10_00, 5), 2);

        assert_eq!(store.quantity_of(&ProductId::new("p1")), 2);
    }

    #[test]
    fn every_mutation_is_persisted() -> TestResult {
        let mut store = CartStore::load(MemoryStorage::new());

        store.add_item(snapshot("p1", "s1", 10_00, 5), 2);

        let persisted = store.storage().get(CART_STORAGE_KEY)?.unwrap_or_default();

        assert_eq!(decode_cart(&persisted), *store.cart());

        store.clear();

        assert_eq!(store.storage().get(CART_STORAGE_KEY)?, Some("[]".to_string()));

        Ok(())
    }

    #[test]
    fn persisted_lines_use_camel_case_fields() -> TestResult {
        let mut store = CartStore::load(MemoryStorage::new());

        store.add_item(snapshot("p1", "s1", 10_00, 5), 2);

        let persisted = store.storage().get(CART_STORAGE_KEY)?.unwrap_or_default();
        let value: Value = serde_json::from_str(&persisted)?;

        assert_eq!(value[0]["productId"], "p1");
        assert_eq!(value[0]["sellerId"], "s1");
        assert_eq!(value[0]["unitPrice"], 1000);
        assert_eq!(value[0]["stockCeiling"], 5);
        assert_eq!(value[0]["quantity"], 2);

        Ok(())
    }

    #[test]
    fn lines_from_older_schemas_are_dropped_individually() {
        let raw = r#"[
            {"productId":"p1","name":"Tomato","unitPrice":3000,"sellerId":"s1","quantity":2,"stockCeiling":10},
            {"productId":"p2","name":"Onion","price":2000,"quantity":1}
        ]"#;

        let cart = decode_cart(raw);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("p1")), 2);
    }

    #[test]
    fn reload_picks_up_foreign_writes() -> TestResult {
        let mut store = CartStore::load(MemoryStorage::new());
        let mut foreign = Cart::new();

        store.add_item(snapshot("p1", "s1", 10_00, 5), 2);
        foreign.add_item(snapshot("p9", "s9", 1_00, 1), 1);

        save_cart(store.storage_mut(), CART_STORAGE_KEY, &foreign)?;
        store.reload();

        assert_eq!(*store.cart(), foreign);

        Ok(())
    }
}
