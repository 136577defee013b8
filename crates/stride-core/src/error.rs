//! # Error Types
//!
//! Domain-specific error types for stride-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Collaborator errors (returned by ports)                               │
//! │  ├── LookupError      - stock / catalog query failed                   │
//! │  └── StoreError       - snapshot load / save failed                    │
//! │                                                                         │
//! │  Cart errors (internal to CartManager)                                 │
//! │  └── CartError        - StockExceeded, AddFailed, RemoveFailed,        │
//! │                         UpdateFailed                                   │
//! │                                                                         │
//! │  ValidationError      - malformed cart snapshot                        │
//! │                                                                         │
//! │  Flow: LookupError → CartError → Notifier::error(user_message)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `CartError` never leaves the manager: each variant maps to one fixed
//! user-facing message (see [`messages`]) that is handed to the notifier.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// User-Facing Messages
// =============================================================================

/// Fixed messages shown to the shopper (pt-BR), one per failure kind.
pub mod messages {
    /// Requested quantity is above the available stock.
    pub const STOCK_EXCEEDED: &str = "Quantidade solicitada fora de estoque";

    /// Adding a product failed (stock or catalog lookup).
    pub const ADD_FAILED: &str = "Erro na adição do produto";

    /// Removing a product that is not in the cart.
    pub const REMOVE_FAILED: &str = "Erro na remoção do produto";

    /// Updating a product quantity failed.
    pub const UPDATE_FAILED: &str = "Erro na alteração de quantidade do produto";
}

// =============================================================================
// Collaborator Errors
// =============================================================================

/// A stock or catalog query failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The service does not know this product.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The service could not be reached or answered garbage.
    #[error("Lookup service unavailable: {0}")]
    Unavailable(String),
}

/// Loading or saving a cart snapshot failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot could not be encoded or decoded.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage medium failed.
    #[error("Storage backend failed: {0}")]
    Backend(String),
}

// =============================================================================
// Cart Error
// =============================================================================

/// Why an update was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateCause {
    #[error("product is not in the cart")]
    NotInCart,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// A cart operation was rejected. The committed cart is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Requested quantity above available stock (add and update).
    ///
    /// ## User Workflow
    /// ```text
    /// Click "+" on a cart line (qty 5 → 6)
    ///      │
    ///      ▼
    /// Stock service: available = 5
    ///      │
    ///      ▼
    /// StockExceeded { requested: 6, available: 5 }
    ///      │
    ///      ▼
    /// Notifier: "Quantidade solicitada fora de estoque", cart stays at 5
    /// ```
    #[error("Requested {requested} of product {id}, only {available} in stock")]
    StockExceeded {
        id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Stock or catalog lookup failed while adding.
    #[error("Adding product {id} failed: {source}")]
    AddFailed {
        id: ProductId,
        #[source]
        source: LookupError,
    },

    /// Product to remove is not in the cart.
    #[error("Product {id} is not in the cart")]
    RemoveFailed { id: ProductId },

    /// Product to update is not in the cart, or the stock lookup failed.
    #[error("Updating product {id} failed: {cause}")]
    UpdateFailed {
        id: ProductId,
        #[source]
        cause: UpdateCause,
    },
}

impl CartError {
    /// The fixed message shown to the shopper for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            CartError::StockExceeded { .. } => messages::STOCK_EXCEEDED,
            CartError::AddFailed { .. } => messages::ADD_FAILED,
            CartError::RemoveFailed { .. } => messages::REMOVE_FAILED,
            CartError::UpdateFailed { .. } => messages::UPDATE_FAILED,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A cart snapshot breaks the cart invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Numeric value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Same product appears twice.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_messages() {
        let err = CartError::StockExceeded {
            id: ProductId(1),
            requested: 6,
            available: 5,
        };
        assert_eq!(err.to_string(), "Requested 6 of product 1, only 5 in stock");
        assert_eq!(err.user_message(), messages::STOCK_EXCEEDED);
    }

    #[test]
    fn test_each_variant_has_its_own_message() {
        let add = CartError::AddFailed {
            id: ProductId(1),
            source: LookupError::NotFound(ProductId(1)),
        };
        let remove = CartError::RemoveFailed { id: ProductId(1) };
        let update = CartError::UpdateFailed {
            id: ProductId(1),
            cause: UpdateCause::NotInCart,
        };

        assert_eq!(add.user_message(), messages::ADD_FAILED);
        assert_eq!(remove.user_message(), messages::REMOVE_FAILED);
        assert_eq!(update.user_message(), messages::UPDATE_FAILED);
    }

    #[test]
    fn test_shopper_messages_are_portuguese() {
        let stock = CartError::StockExceeded {
            id: ProductId(2),
            requested: 2,
            available: 1,
        };
        assert_eq!(stock.user_message(), "Quantidade solicitada fora de estoque");
        assert_eq!(
            CartError::RemoveFailed { id: ProductId(2) }.user_message(),
            "Erro na remoção do produto"
        );
    }

    #[test]
    fn test_lookup_error_is_exposed_as_source() {
        let err = CartError::AddFailed {
            id: ProductId(7),
            source: LookupError::Unavailable("connection refused".to_string()),
        };
        let source = err.source().expect("lookup error is the source");
        assert_eq!(
            source.to_string(),
            "Lookup service unavailable: connection refused"
        );
    }

    #[test]
    fn test_update_cause_from_lookup() {
        let cause: UpdateCause = LookupError::NotFound(ProductId(3)).into();
        assert_eq!(cause.to_string(), "Product not found: 3");
    }
}
