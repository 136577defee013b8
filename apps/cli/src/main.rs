//! # Stride CLI Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           stride                                        │
//! │                                                                         │
//! │  main.rs ────► hands off to stride_cli::run()                          │
//! │                                                                         │
//! │  lib.rs ─────► logging, config, database, state, dispatch              │
//! │                                                                         │
//! │  commands/ ──► show / add / remove / set / products                    │
//! │                                                                         │
//! │  state/ ─────► Storefront, CartState, ConfigState                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    stride_cli::run().await
}
