//! # Validation Module
//!
//! Checks that a cart snapshot coming back from storage still satisfies the
//! cart invariants before the manager adopts it.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Lifecycle                                 │
//! │                                                                         │
//! │  DurableStore::load()                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  serde_json decode ── fails ──► StoreError ──► start empty            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_cart() ─── fails ──► ValidationError ──► start empty        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartManager adopts the snapshot                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock levels are not checked here: they may have changed since the cart
//! was saved, and the cart rules only compare against stock on mutation.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::Cart;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a single quantity.
///
/// ```rust
/// use stride_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a whole cart: unique ids, positive quantities.
pub fn validate_cart(cart: &Cart) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(cart.len());

    for item in cart {
        if !seen.insert(item.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.to_string(),
            });
        }
        validate_quantity(item.quantity)?;
    }

    Ok(())
}
