//! # Repository Module
//!
//! Database repositories for Stride Cart. Each one also implements the
//! stride-core port it backs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Repository            Table            Port                           │
//! │  ──────────            ─────            ────                           │
//! │  ProductRepository     products         ProductCatalog                 │
//! │  StockRepository       stock            StockOracle                    │
//! │  CartRepository        cart_snapshots   DurableStore                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod product;
pub mod stock;
