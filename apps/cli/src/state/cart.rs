//! # Cart State
//!
//! The [`CartManager`] for this session plus the terminal notifier it
//! reports to.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  CLI Command            CartState                 CartManager           │
//! │  ───────────            ─────────                 ───────────           │
//! │                                                                         │
//! │  stride add 3 ────────► manager().add(3) ───────► stock, catalog, save │
//! │                                                                         │
//! │  stride set 3 2 ──────► manager().update_amount ► stock, save          │
//! │                                                                         │
//! │  stride remove 3 ─────► manager().remove(3) ────► save                 │
//! │                                                                         │
//! │  stride show ─────────► with_cart(render) ──────► (read only)          │
//! │                                                                         │
//! │  Rejections go to TerminalNotifier: stderr + warn log, and the          │
//! │  process exits with status 1.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stride_core::{Cart, CartManager, Collaborators, DurableStore, Notifier};
use tracing::warn;

use super::storefront::Storefront;

/// Prints cart notifications to stderr and counts them.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    raised: AtomicUsize,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications raised so far.
    pub fn raised(&self) -> usize {
        self.raised.load(Ordering::SeqCst)
    }
}

impl Notifier for TerminalNotifier {
    fn error(&self, message: &str) {
        self.raised.fetch_add(1, Ordering::SeqCst);
        warn!(message, "Cart notification");
        eprintln!("✗ {}", message);
    }
}

/// Cart session state.
#[derive(Debug)]
pub struct CartState {
    manager: CartManager,
    notifier: Arc<TerminalNotifier>,
}

impl CartState {
    /// Loads the persisted cart against the given storefront.
    pub async fn open(storefront: &Storefront, store: Arc<dyn DurableStore>) -> Self {
        let notifier = Arc::new(TerminalNotifier::new());
        let deps = Collaborators {
            stock: storefront.stock(),
            catalog: storefront.catalog(),
            store,
            notifier: notifier.clone(),
        };

        CartState {
            manager: CartManager::load(deps).await,
            notifier,
        }
    }

    /// Wraps an already built manager. `notifier` must be the one the
    /// manager reports to.
    pub fn from_parts(manager: CartManager, notifier: Arc<TerminalNotifier>) -> Self {
        CartState { manager, notifier }
    }

    pub fn manager(&self) -> &CartManager {
        &self.manager
    }

    /// Runs a read-only function against the committed cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.manager.cart())
    }

    /// Notifications raised during this session.
    pub fn notifications(&self) -> usize {
        self.notifier.raised()
    }
}
