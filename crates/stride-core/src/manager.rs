//! # Cart Manager
//!
//! Owns the cart and applies the stock-aware add / remove / update rules.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartManager Operations                               │
//! │                                                                         │
//! │  add(id) ──────────┐                                                    │
//! │  remove(id) ───────┼──► writer gate (one mutation at a time)            │
//! │  update_amount() ──┘          │                                         │
//! │                               ▼                                         │
//! │              read committed snapshot (Arc<Cart>)                        │
//! │                               │                                         │
//! │                   stock / catalog lookups (await)                       │
//! │                               │                                         │
//! │                clone → edit private copy → next Cart                    │
//! │                    │                           │                        │
//! │                 rejected                    accepted                    │
//! │                    │                           │                        │
//! │        Notifier::error(message)     swap snapshot, then save            │
//! │        (snapshot untouched)                                             │
//! │                                                                         │
//! │  cart() ──► clone of committed Arc<Cart> (never waits on the gate)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency
//! - The committed snapshot is only ever replaced wholesale, so readers see
//!   either the pre- or the post-mutation cart, never a half-edited one.
//! - The writer gate is held across the lookups: two overlapping calls
//!   cannot both start from the same snapshot and overwrite each other.
//! - Saves happen under the gate too, so the store sees commits in order.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CartError, CartResult, UpdateCause};
use crate::ports::{DurableStore, Notifier, ProductCatalog, StockOracle};
use crate::types::{Cart, CartItem, ProductId};
use crate::validation::validate_cart;

/// The collaborators a [`CartManager`] talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub stock: Arc<dyn StockOracle>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub store: Arc<dyn DurableStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Stock-aware cart with copy-on-write commits.
pub struct CartManager {
    deps: Collaborators,
    committed: RwLock<Arc<Cart>>,
    writer: Mutex<()>,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// Starts a session from whatever the store holds.
    ///
    /// An absent snapshot gives an empty cart. So does a snapshot that fails
    /// to load or breaks the cart invariants; that case is logged and the
    /// bad snapshot is left in the store until the next commit replaces it.
    pub async fn load(deps: Collaborators) -> Self {
        let cart = match deps.store.load().await {
            Ok(Some(cart)) => match validate_cart(&cart) {
                Ok(()) => cart,
                Err(err) => {
                    warn!(error = %err, "Discarding invalid cart snapshot");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(err) => {
                warn!(error = %err, "Failed to load cart snapshot, starting empty");
                Cart::new()
            }
        };

        info!(items = cart.len(), "Cart session started");
        Self::with_cart(deps, cart)
    }

    /// Starts a session from an explicit cart, bypassing the store.
    pub fn with_cart(deps: Collaborators, cart: Cart) -> Self {
        CartManager {
            deps,
            committed: RwLock::new(Arc::new(cart)),
            writer: Mutex::new(()),
        }
    }

    /// The last committed cart.
    pub fn cart(&self) -> Arc<Cart> {
        let committed = self.committed.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*committed)
    }

    /// Adds one unit of a product.
    ///
    /// ## Rules
    /// - The stock lookup runs first; its failure aborts with `AddFailed`
    /// - `current + 1 > available` aborts with `StockExceeded`, as does a
    ///   `current + 1` that does not fit in an `i64`
    /// - Existing item: quantity goes up by one, position kept
    /// - New item: fetched from the catalog and appended with quantity 1
    pub async fn add(&self, id: ProductId) {
        debug!(product_id = %id, "add");
        let _gate = self.writer.lock().await;

        let outcome = self.next_after_add(id).await;
        self.finish(outcome).await;
    }

    /// Removes a product entirely. No stock check.
    pub async fn remove(&self, id: ProductId) {
        debug!(product_id = %id, "remove");
        let _gate = self.writer.lock().await;

        let mut next = Cart::clone(&self.cart());
        let outcome = match next.remove(id) {
            Some(_) => Ok(next),
            None => Err(CartError::RemoveFailed { id }),
        };
        self.finish(outcome).await;
    }

    /// Sets the quantity of a product already in the cart.
    ///
    /// A non-positive `amount` is ignored without any notification, unlike
    /// `add` against zero stock which is reported.
    pub async fn update_amount(&self, id: ProductId, amount: i64) {
        debug!(product_id = %id, amount, "update_amount");
        if amount <= 0 {
            return;
        }
        let _gate = self.writer.lock().await;

        let outcome = self.next_after_update(id, amount).await;
        self.finish(outcome).await;
    }

    async fn next_after_add(&self, id: ProductId) -> CartResult<Cart> {
        let current = self.cart();

        let available = self
            .deps
            .stock
            .available(id)
            .await
            .map_err(|source| CartError::AddFailed { id, source })?;

        let held = current.quantity_of(id);
        let desired = match held.checked_add(1) {
            Some(desired) if desired <= available => desired,
            _ => {
                return Err(CartError::StockExceeded {
                    id,
                    requested: held.saturating_add(1),
                    available,
                })
            }
        };

        let mut next = Cart::clone(&current);
        if !next.set_quantity(id, desired) {
            let product = self
                .deps
                .catalog
                .product(id)
                .await
                .map_err(|source| CartError::AddFailed { id, source })?;
            next.push(CartItem::from_product(product, 1));
        }
        Ok(next)
    }

    async fn next_after_update(&self, id: ProductId, amount: i64) -> CartResult<Cart> {
        let available = self
            .deps
            .stock
            .available(id)
            .await
            .map_err(|err| CartError::UpdateFailed {
                id,
                cause: UpdateCause::from(err),
            })?;

        if amount > available {
            return Err(CartError::StockExceeded {
                id,
                requested: amount,
                available,
            });
        }

        let mut next = Cart::clone(&self.cart());
        if !next.set_quantity(id, amount) {
            return Err(CartError::UpdateFailed {
                id,
                cause: UpdateCause::NotInCart,
            });
        }
        Ok(next)
    }

    /// Commits an accepted cart or reports a rejection. Caller holds the gate.
    async fn finish(&self, outcome: CartResult<Cart>) {
        match outcome {
            Ok(next) => self.commit(next).await,
            Err(err) => {
                warn!(error = %err, "Cart operation rejected");
                self.deps.notifier.error(err.user_message());
            }
        }
    }

    async fn commit(&self, next: Cart) {
        let next = Arc::new(next);
        *self
            .committed
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);

        info!(
            items = next.len(),
            quantity = next.total_quantity(),
            "Cart committed"
        );

        // Best effort: the in-memory commit stands even if the write fails.
        if let Err(err) = self.deps.store.save(&next).await {
            warn!(error = %err, "Failed to persist cart snapshot");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{messages, LookupError};
    use crate::memory::{InMemoryStore, RecordingNotifier, StaticInventory};
    use crate::ports::DurableStore;
    use crate::types::Product;

    use async_trait::async_trait;
    use proptest::prelude::*;
    use tokio::sync::Notify;

    struct Harness {
        inventory: Arc<StaticInventory>,
        store: Arc<InMemoryStore>,
        notifier: Arc<RecordingNotifier>,
    }

    impl Harness {
        fn new(inventory: StaticInventory) -> Self {
            Harness {
                inventory: Arc::new(inventory),
                store: Arc::new(InMemoryStore::new()),
                notifier: Arc::new(RecordingNotifier::new()),
            }
        }

        fn deps(&self) -> Collaborators {
            Collaborators {
                stock: self.inventory.clone(),
                catalog: self.inventory.clone(),
                store: self.store.clone(),
                notifier: self.notifier.clone(),
            }
        }

        async fn manager(&self) -> CartManager {
            CartManager::load(self.deps()).await
        }
    }

    fn product(id: i64) -> Product {
        Product {
            id: ProductId(id),
            title: format!("Tênis {}", id),
            price_cents: 10000 + id,
            image: format!("https://img.example/{}.jpg", id),
        }
    }

    fn quantities(cart: &Cart) -> Vec<(i64, i64)> {
        cart.iter().map(|i| (i.id.get(), i.quantity)).collect()
    }

    #[tokio::test]
    async fn test_scenario_add_update_remove() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 5));
        let cart = h.manager().await;

        cart.add(ProductId(1)).await;
        assert_eq!(quantities(&cart.cart()), vec![(1, 1)]);

        cart.add(ProductId(1)).await;
        assert_eq!(quantities(&cart.cart()), vec![(1, 2)]);

        cart.update_amount(ProductId(1), 5).await;
        assert_eq!(quantities(&cart.cart()), vec![(1, 5)]);

        cart.update_amount(ProductId(1), 6).await;
        assert_eq!(quantities(&cart.cart()), vec![(1, 5)]);
        assert_eq!(h.notifier.messages(), vec![messages::STOCK_EXCEEDED]);

        cart.remove(ProductId(1)).await;
        assert!(cart.cart().is_empty());
        assert_eq!(h.notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_add_twice_merges_into_one_item() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 10));
        let cart = h.manager().await;

        cart.add(ProductId(1)).await;
        cart.add(ProductId(1)).await;

        let snapshot = cart.cart();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.quantity_of(ProductId(1)), 2);
        assert!(h.notifier.is_empty());
    }

    #[tokio::test]
    async fn test_add_appends_new_items_in_order() {
        let h = Harness::new(
            StaticInventory::new()
                .with_product(product(3), 5)
                .with_product(product(1), 5)
                .with_product(product(2), 5),
        );
        let cart = h.manager().await;

        cart.add(ProductId(3)).await;
        cart.add(ProductId(1)).await;
        cart.add(ProductId(2)).await;
        cart.add(ProductId(1)).await;

        assert_eq!(quantities(&cart.cart()), vec![(3, 1), (1, 2), (2, 1)]);
        let snapshot = cart.cart();
        let first = &snapshot.items()[0];
        assert_eq!(first.title, "Tênis 3");
        assert_eq!(first.price_cents, 10003);
    }

    #[tokio::test]
    async fn test_add_with_zero_stock_is_reported() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 0));
        let cart = h.manager().await;

        cart.add(ProductId(1)).await;

        assert!(cart.cart().is_empty());
        assert_eq!(h.notifier.messages(), vec![messages::STOCK_EXCEEDED]);
        assert_eq!(h.store.saves(), 0);
    }

    #[tokio::test]
    async fn test_add_stock_lookup_failure() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 5));
        let cart = h.manager().await;
        h.inventory.set_offline(true);

        cart.add(ProductId(1)).await;

        assert!(cart.cart().is_empty());
        assert_eq!(h.notifier.messages(), vec![messages::ADD_FAILED]);
    }

    #[tokio::test]
    async fn test_add_catalog_failure_leaves_cart_unchanged() {
        let inventory = StaticInventory::new().with_product(product(1), 5);
        inventory.set_stock(ProductId(2), 5);
        let h = Harness::new(inventory);
        let cart = h.manager().await;
        cart.add(ProductId(1)).await;

        cart.add(ProductId(2)).await;

        assert_eq!(quantities(&cart.cart()), vec![(1, 1)]);
        assert_eq!(h.notifier.messages(), vec![messages::ADD_FAILED]);
        assert_eq!(h.store.saves(), 1);
    }

    #[tokio::test]
    async fn test_existing_item_does_not_hit_catalog() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 5));
        let cart = h.manager().await;
        cart.add(ProductId(1)).await;
        h.inventory.remove_product(ProductId(1));

        cart.add(ProductId(1)).await;

        assert_eq!(quantities(&cart.cart()), vec![(1, 2)]);
        assert!(h.notifier.is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_item() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 5));
        let cart = h.manager().await;
        cart.add(ProductId(1)).await;
        let before = h.store.raw();
        let snapshot = cart.cart();

        cart.remove(ProductId(42)).await;

        assert_eq!(*cart.cart(), *snapshot);
        assert_eq!(h.store.raw(), before);
        assert_eq!(h.notifier.messages(), vec![messages::REMOVE_FAILED]);
    }

    #[tokio::test]
    async fn test_remove_needs_no_stock_service() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 5));
        let cart = h.manager().await;
        cart.add(ProductId(1)).await;
        h.inventory.set_offline(true);

        cart.remove(ProductId(1)).await;

        assert!(cart.cart().is_empty());
        assert!(h.notifier.is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_update_is_silent_noop() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 5));
        let cart = h.manager().await;
        cart.add(ProductId(1)).await;
        h.inventory.set_offline(true);

        cart.update_amount(ProductId(1), 0).await;
        cart.update_amount(ProductId(1), -3).await;

        assert_eq!(quantities(&cart.cart()), vec![(1, 1)]);
        assert!(h.notifier.is_empty());
        assert_eq!(h.store.saves(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let inventory = StaticInventory::new();
        inventory.set_stock(ProductId(7), 5);
        let h = Harness::new(inventory);
        let cart = h.manager().await;

        cart.update_amount(ProductId(7), 2).await;

        assert!(cart.cart().is_empty());
        assert_eq!(h.notifier.messages(), vec![messages::UPDATE_FAILED]);
    }

    #[tokio::test]
    async fn test_update_checks_stock_before_presence() {
        let inventory = StaticInventory::new();
        inventory.set_stock(ProductId(7), 1);
        let h = Harness::new(inventory);
        let cart = h.manager().await;

        cart.update_amount(ProductId(7), 2).await;

        assert_eq!(h.notifier.messages(), vec![messages::STOCK_EXCEEDED]);
    }

    #[tokio::test]
    async fn test_update_stock_lookup_failure() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 5));
        let cart = h.manager().await;
        cart.add(ProductId(1)).await;
        h.inventory.set_offline(true);

        cart.update_amount(ProductId(1), 3).await;

        assert_eq!(quantities(&cart.cart()), vec![(1, 1)]);
        assert_eq!(h.notifier.messages(), vec![messages::UPDATE_FAILED]);
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_across_sessions() {
        let h = Harness::new(
            StaticInventory::new()
                .with_product(product(1), 5)
                .with_product(product(2), 5),
        );
        let first = h.manager().await;
        first.add(ProductId(1)).await;
        first.add(ProductId(2)).await;
        first.update_amount(ProductId(2), 4).await;
        let committed = first.cart();

        let reloaded = h.store.load().await.unwrap().expect("snapshot saved");
        assert_eq!(reloaded, *committed);

        let second = h.manager().await;
        assert_eq!(*second.cart(), *committed);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_in_memory_commit_silently() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 5));
        let cart = h.manager().await;
        h.store.set_fail_saves(true);

        cart.add(ProductId(1)).await;

        assert_eq!(quantities(&cart.cart()), vec![(1, 1)]);
        assert!(h.notifier.is_empty());
        assert!(h.store.raw().is_none());
    }

    #[tokio::test]
    async fn test_invalid_snapshot_starts_empty() {
        let dup = CartItem::from_product(product(1), 1);
        let bad = Cart::from(vec![dup.clone(), dup]);
        let h = Harness {
            inventory: Arc::new(StaticInventory::new()),
            store: Arc::new(InMemoryStore::seeded(&bad).unwrap()),
            notifier: Arc::new(RecordingNotifier::new()),
        };

        assert!(h.manager().await.cart().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_starts_empty() {
        let h = Harness {
            inventory: Arc::new(StaticInventory::new()),
            store: Arc::new(InMemoryStore::with_raw("[{\"id\":")),
            notifier: Arc::new(RecordingNotifier::new()),
        };

        assert!(h.manager().await.cart().is_empty());
        assert!(h.notifier.is_empty());
    }

    #[tokio::test]
    async fn test_add_at_quantity_ceiling_is_stock_exceeded() {
        let full = CartItem::from_product(product(1), i64::MAX);
        let h = Harness {
            inventory: Arc::new(StaticInventory::new().with_product(product(1), i64::MAX)),
            store: Arc::new(InMemoryStore::seeded(&Cart::from(vec![full])).unwrap()),
            notifier: Arc::new(RecordingNotifier::new()),
        };
        let cart = h.manager().await;
        assert_eq!(cart.cart().quantity_of(ProductId(1)), i64::MAX);

        cart.add(ProductId(1)).await;

        assert_eq!(quantities(&cart.cart()), vec![(1, i64::MAX)]);
        assert_eq!(h.notifier.messages(), vec![messages::STOCK_EXCEEDED]);
        assert_eq!(h.store.saves(), 0);

        let totals = crate::types::CartTotals::from(&*cart.cart());
        assert_eq!(totals.total_quantity, i64::MAX);
        assert_eq!(totals.subtotal_cents, i64::MAX);
    }

    #[tokio::test]
    async fn test_web_storefront_snapshot_is_adopted() {
        let h = Harness {
            inventory: Arc::new(StaticInventory::new().with_product(product(1), 5)),
            store: Arc::new(InMemoryStore::with_raw(
                r#"[{"id":1,"title":"Tênis","price":179.9,"image":"a.jpg","amount":2}]"#,
            )),
            notifier: Arc::new(RecordingNotifier::new()),
        };
        let cart = h.manager().await;
        assert_eq!(quantities(&cart.cart()), vec![(1, 2)]);

        cart.add(ProductId(1)).await;

        let saved = h.store.load().await.unwrap().expect("snapshot saved");
        assert_eq!(quantities(&saved), vec![(1, 3)]);
        assert_eq!(saved.items()[0].title, "Tênis");
        assert_eq!(saved.items()[0].price_cents, 17990);
    }

    /// Stock oracle that parks every query until released.
    struct GatedStock {
        inner: Arc<StaticInventory>,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl StockOracle for GatedStock {
        async fn available(&self, id: ProductId) -> Result<i64, LookupError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.available(id).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_readers_see_committed_cart_while_lookup_pending() {
        let inventory = Arc::new(StaticInventory::new().with_product(product(1), 5));
        let stock = Arc::new(GatedStock {
            inner: inventory.clone(),
            entered: Notify::new(),
            release: Notify::new(),
        });
        let deps = Collaborators {
            stock: stock.clone(),
            catalog: inventory.clone(),
            store: Arc::new(InMemoryStore::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        };
        let initial = Cart::from(vec![CartItem::from_product(product(1), 1)]);
        let cart = Arc::new(CartManager::with_cart(deps, initial));

        let task = tokio::spawn({
            let cart = cart.clone();
            async move { cart.add(ProductId(1)).await }
        });

        stock.entered.notified().await;
        assert_eq!(quantities(&cart.cart()), vec![(1, 1)]);

        stock.release.notify_one();
        task.await.unwrap();
        assert_eq!(quantities(&cart.cart()), vec![(1, 2)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_do_not_lose_updates() {
        let h = Harness::new(StaticInventory::new().with_product(product(1), 100));
        let cart = Arc::new(h.manager().await);

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let cart = cart.clone();
                tokio::spawn(async move { cart.add(ProductId(1)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(cart.cart().quantity_of(ProductId(1)), 20);
        let saved = h.store.load().await.unwrap().expect("snapshot saved");
        assert_eq!(saved.quantity_of(ProductId(1)), 20);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(i64),
        Remove(i64),
        Update(i64, i64),
        Restock(i64, i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1..4i64).prop_map(Op::Add),
            (1..4i64).prop_map(Op::Remove),
            (1..4i64, -2..8i64).prop_map(|(id, n)| Op::Update(id, n)),
            (1..4i64, 0..6i64).prop_map(|(id, n)| Op::Restock(id, n)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 200,
            ..ProptestConfig::default()
        })]

        /// Property: every commit respects the stock reported at that moment.
        #[test]
        fn committed_quantities_never_exceed_stock(ops in prop::collection::vec(op(), 1..40)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            runtime.block_on(async {
                let inventory = StaticInventory::new()
                    .with_product(product(1), 3)
                    .with_product(product(2), 1)
                    .with_product(product(3), 0);
                let h = Harness::new(inventory);
                let cart = h.manager().await;
                let mut stock = std::collections::HashMap::from([(1i64, 3i64), (2, 1), (3, 0)]);

                for op in ops {
                    let before = cart.cart();
                    match op {
                        Op::Add(id) => cart.add(ProductId(id)).await,
                        Op::Remove(id) => cart.remove(ProductId(id)).await,
                        Op::Update(id, n) => cart.update_amount(ProductId(id), n).await,
                        Op::Restock(id, n) => {
                            h.inventory.set_stock(ProductId(id), n);
                            stock.insert(id, n);
                        }
                    }

                    let after = cart.cart();
                    let mut ids = std::collections::HashSet::new();
                    for item in after.iter() {
                        assert!(item.quantity >= 1);
                        assert!(ids.insert(item.id));
                    }
                    if !Arc::ptr_eq(&before, &after) {
                        // Only the touched item can change, and it fits current stock.
                        for item in after.iter() {
                            if before.find(item.id) != Some(item) {
                                assert!(item.quantity <= stock[&item.id.get()]);
                            }
                        }
                    }
                }
            });
        }
    }
}
