//! # Collaborator Ports
//!
//! The four contracts `CartManager` needs from the outside world.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CartManager                                     │
//! │                                                                         │
//! │    StockOracle ──────► available(id)      (async, may fail)            │
//! │    ProductCatalog ───► product(id)        (async, may fail)            │
//! │    DurableStore ─────► load() / save()    (async, best effort save)    │
//! │    Notifier ─────────► error(message)     (fire and forget)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Adapters:
//! - `stride_db`: SQLite catalog, stock and snapshot store
//! - `stride` CLI: HTTP storefront client, terminal notifier
//! - [`crate::memory`]: in-memory versions for tests

use async_trait::async_trait;

use crate::error::{LookupError, StoreError};
use crate::types::{Cart, Product, ProductId};

/// Reports how many units of a product are available.
#[async_trait]
pub trait StockOracle: Send + Sync {
    async fn available(&self, id: ProductId) -> Result<i64, LookupError>;
}

/// Resolves full product data for first-time additions.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError>;
}

/// Persists the cart between sessions.
///
/// `load` returns `Ok(None)` when nothing has been saved yet.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn load(&self) -> Result<Option<Cart>, StoreError>;

    async fn save(&self, cart: &Cart) -> Result<(), StoreError>;
}

/// Surfaces user-facing messages.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}
