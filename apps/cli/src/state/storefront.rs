//! # Storefront State
//!
//! The stock and catalog source selected by [`Backend`]. The SQLite
//! database is always open because it holds the cart snapshot either way.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backend::Sqlite     stock ─► StockRepository                          │
//! │                      catalog ─► ProductRepository                      │
//! │                                                                         │
//! │  Backend::Http       stock ─► StorefrontClient  GET /stock/{id}        │
//! │                      catalog ─► StorefrontClient  GET /products/{id}   │
//! │                                                                         │
//! │  both                store ─► CartRepository (cart_snapshots)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use stride_core::{DurableStore, Product, ProductCatalog, StockOracle};
use stride_db::Database;

use super::config::{Backend, ConfigState};
use crate::api::StorefrontClient;
use crate::error::ApiError;

/// Stock and catalog lookups for the active backend.
#[derive(Debug, Clone)]
pub enum Storefront {
    Sqlite(Database),
    Http(StorefrontClient),
}

impl Storefront {
    /// Selects the backend named in the configuration.
    pub fn from_config(config: &ConfigState, db: &Database) -> Result<Self, ApiError> {
        match config.backend {
            Backend::Sqlite => Ok(Storefront::Sqlite(db.clone())),
            Backend::Http => Ok(Storefront::Http(StorefrontClient::new(
                config.api_url.clone(),
                config.http_timeout(),
            )?)),
        }
    }

    pub fn stock(&self) -> Arc<dyn StockOracle> {
        match self {
            Storefront::Sqlite(db) => Arc::new(db.stock()),
            Storefront::Http(client) => Arc::new(client.clone()),
        }
    }

    pub fn catalog(&self) -> Arc<dyn ProductCatalog> {
        match self {
            Storefront::Sqlite(db) => Arc::new(db.products()),
            Storefront::Http(client) => Arc::new(client.clone()),
        }
    }

    /// Lists the catalog in id order.
    pub async fn list_products(&self, limit: u32) -> Result<Vec<Product>, ApiError> {
        match self {
            Storefront::Sqlite(db) => Ok(db.products().list(limit).await?),
            Storefront::Http(client) => Ok(client.list_products(limit).await?),
        }
    }
}

/// Snapshot store for the configured cart key.
pub fn cart_store(config: &ConfigState, db: &Database) -> Arc<dyn DurableStore> {
    Arc::new(db.carts(config.cart_key.clone()))
}
