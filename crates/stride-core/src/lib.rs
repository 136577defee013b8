//! # stride-core: Cart Rules for Stride Cart
//!
//! This crate is the **heart** of Stride Cart. It owns the shopping cart and
//! the stock-aware rules for changing it, and defines the contracts it needs
//! from the outside world. It performs no I/O itself.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stride Cart Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    stride CLI (apps/cli)                        │   │
//! │  │    show ──► add ──► set ──► remove                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stride-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  manager  │  │   ports   │  │   types   │  │ validation│  │   │
//! │  │   │CartManager│  │ StockOracl│  │   Cart    │  │  snapshot │  │   │
//! │  │   │           │  │ Catalog…  │  │ CartItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  └────────────────────────┼────────────────────────────────────────┘   │
//! │                           │ implemented by                             │
//! │  ┌────────────────────────▼────────────────────────────────────────┐   │
//! │  │  stride-db (SQLite)   ·   StorefrontClient (HTTP)   ·  memory   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`manager`] - `CartManager`: add / remove / update_amount / cart
//! - [`ports`] - `StockOracle`, `ProductCatalog`, `DurableStore`, `Notifier`
//! - [`types`] - `ProductId`, `Product`, `CartItem`, `Cart`, `CartTotals`
//! - [`money`] - integer `Money`
//! - [`error`] - `CartError`, `LookupError`, `StoreError`, user messages
//! - [`validation`] - snapshot invariant checks
//! - [`memory`] - in-memory collaborators
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use stride_core::memory::{InMemoryStore, RecordingNotifier, StaticInventory};
//! use stride_core::{CartManager, Collaborators, Product, ProductId};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let inventory = Arc::new(StaticInventory::new().with_product(
//!     Product {
//!         id: ProductId(1),
//!         title: "Tênis de Caminhada".to_string(),
//!         price_cents: 17990,
//!         image: String::new(),
//!     },
//!     5,
//! ));
//! let cart = CartManager::load(Collaborators {
//!     stock: inventory.clone(),
//!     catalog: inventory,
//!     store: Arc::new(InMemoryStore::new()),
//!     notifier: Arc::new(RecordingNotifier::new()),
//! })
//! .await;
//!
//! cart.add(ProductId(1)).await;
//! cart.add(ProductId(1)).await;
//! assert_eq!(cart.cart().quantity_of(ProductId(1)), 2);
//! # });
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod manager;
pub mod memory;
pub mod money;
pub mod ports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{messages, CartError, LookupError, StoreError, ValidationError};
pub use manager::{CartManager, Collaborators};
pub use money::Money;
pub use ports::{DurableStore, Notifier, ProductCatalog, StockOracle};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default key the cart snapshot is stored under.
///
/// Same key the web storefront uses in browser storage. A cart copied from
/// there decodes as-is (see [`CartItem`]), but is written back in the
/// native snapshot format.
pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";
