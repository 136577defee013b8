//! # In-Memory Collaborators
//!
//! Process-local implementations of the ports, for tests and for embedding
//! the cart where no real storage or stock service exists.
//!
//! - [`InMemoryStore`] keeps the snapshot as serialized JSON, so every
//!   save/load goes through the same encoding a real store uses.
//! - [`StaticInventory`] serves both stock and catalog from two maps and can
//!   be switched "offline" to simulate an unreachable service.
//! - [`RecordingNotifier`] records every message.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{LookupError, StoreError};
use crate::ports::{DurableStore, Notifier, ProductCatalog, StockOracle};
use crate::types::{Cart, Product, ProductId};

// =============================================================================
// Store
// =============================================================================

/// Snapshot store backed by a `String` in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: Mutex<Option<String>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `cart` already saved.
    pub fn seeded(cart: &Cart) -> Result<Self, StoreError> {
        let store = Self::new();
        *store.slot() = Some(serde_json::to_string(cart)?);
        Ok(store)
    }

    /// Starts with an arbitrary raw payload (e.g. a corrupt one).
    pub fn with_raw(payload: impl Into<String>) -> Self {
        let store = Self::new();
        *store.slot() = Some(payload.into());
        store
    }

    /// The raw saved payload, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot().clone()
    }

    /// Makes every following `save` fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn load(&self) -> Result<Option<Cart>, StoreError> {
        match self.slot().as_deref() {
            Some(payload) => Ok(Some(serde_json::from_str(payload)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store is read-only".to_string()));
        }
        let payload = serde_json::to_string(cart)?;
        *self.slot() = Some(payload);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Stock + Catalog
// =============================================================================

/// Fixed catalog and stock table.
#[derive(Debug, Default)]
pub struct StaticInventory {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, i64>>,
    offline: AtomicBool,
}

impl StaticInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: registers a product with its stock level.
    pub fn with_product(self, product: Product, available: i64) -> Self {
        self.set_stock(product.id, available);
        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product.id, product);
        self
    }

    /// Sets the stock level, with or without a catalog entry.
    pub fn set_stock(&self, id: ProductId, available: i64) {
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, available);
    }

    /// Drops the catalog entry, leaving the stock level.
    pub fn remove_product(&self, id: ProductId) {
        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    /// While offline every lookup fails with `Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), LookupError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(LookupError::Unavailable("inventory offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StockOracle for StaticInventory {
    async fn available(&self, id: ProductId) -> Result<i64, LookupError> {
        self.ensure_online()?;
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .copied()
            .ok_or(LookupError::NotFound(id))
    }
}

#[async_trait]
impl ProductCatalog for StaticInventory {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.ensure_online()?;
        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(LookupError::NotFound(id))
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Notifier that keeps every message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CartItem;

    fn product(id: i64) -> Product {
        Product {
            id: ProductId(id),
            title: format!("Tênis {}", id),
            price_cents: 17990,
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let store = InMemoryStore::new();
        assert!(store.load().await.unwrap().is_none());

        let cart = Cart::from(vec![CartItem::from_product(product(1), 2)]);
        store.save(&cart).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(cart));
        assert_eq!(store.saves(), 1);
    }

    #[tokio::test]
    async fn test_store_failing_saves_keep_previous_snapshot() {
        let cart = Cart::from(vec![CartItem::from_product(product(1), 1)]);
        let store = InMemoryStore::seeded(&cart).unwrap();
        store.set_fail_saves(true);

        assert!(store.save(&Cart::new()).await.is_err());
        assert_eq!(store.load().await.unwrap(), Some(cart));
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn test_store_corrupt_payload() {
        let store = InMemoryStore::with_raw("{not json");
        assert!(matches!(
            store.load().await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_inventory_lookups() {
        let inventory = StaticInventory::new().with_product(product(1), 5);
        inventory.set_stock(ProductId(2), 3);

        assert_eq!(inventory.available(ProductId(1)).await, Ok(5));
        assert_eq!(inventory.available(ProductId(2)).await, Ok(3));
        assert_eq!(
            inventory.product(ProductId(2)).await,
            Err(LookupError::NotFound(ProductId(2)))
        );

        inventory.set_offline(true);
        assert!(matches!(
            inventory.available(ProductId(1)).await,
            Err(LookupError::Unavailable(_))
        ));
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        assert!(notifier.is_empty());
        notifier.error("first");
        notifier.error("second");
        assert_eq!(notifier.messages(), vec!["first", "second"]);
    }
}
