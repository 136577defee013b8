//! # State Module
//!
//! Per-invocation state for the `stride` binary, split by concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────┬──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  Storefront  │  │  CartState   │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Sqlite(db)  │  │  CartManager │  │  backend         │              │
//! │  │  Http(api)   │  │  Terminal-   │  │  cart_key        │              │
//! │  │              │  │  Notifier    │  │  currency        │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  ConfigState is read-only after startup. CartState owns the only       │
//! │  mutable data and CartManager serializes writes to it.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod storefront;

pub use cart::{CartState, TerminalNotifier};
pub use config::{Backend, ConfigState};
pub use storefront::{cart_store, Storefront};
