//! # Commands Module
//!
//! One function per `stride` subcommand.
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── cart.rs     ◄─── show, add, remove, set
//! └── product.rs  ◄─── products
//! ```
//!
//! Commands take only the state they need and return serializable
//! responses. Printing (table or `--json`) happens in `lib.rs`.

pub mod cart;
pub mod product;
