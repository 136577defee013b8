//! # Stock Repository
//!
//! Available quantities per product, and the [`StockOracle`] port backed by
//! them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stock                                                                  │
//! │  ┌────────────┬────────┐                                                │
//! │  │ product_id │ amount │   amount ≥ 0 (CHECK)                           │
//! │  ├────────────┼────────┤                                                │
//! │  │     1      │   3    │   CartManager asks: available(1) → 3           │
//! │  │     2      │   5    │   missing row → LookupError::NotFound          │
//! │  └────────────┴────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart never decrements stock: it only checks against it.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stride_core::{LookupError, ProductId, StockOracle};

/// Repository for stock levels.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Available amount for a product, `None` if it has no stock row.
    pub async fn get(&self, id: ProductId) -> DbResult<Option<i64>> {
        let amount: Option<i64> =
            sqlx::query_scalar("SELECT amount FROM stock WHERE product_id = ?1")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;

        Ok(amount)
    }

    /// Sets the available amount (insert or overwrite).
    pub async fn set(&self, id: ProductId, amount: i64) -> DbResult<()> {
        debug!(product_id = %id, amount, "Setting stock");

        sqlx::query(
            r#"
            INSERT INTO stock (product_id, amount)
            VALUES (?1, ?2)
            ON CONFLICT (product_id) DO UPDATE SET amount = excluded.amount
            "#,
        )
        .bind(id.get())
        .bind(amount)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl StockOracle for StockRepository {
    async fn available(&self, id: ProductId) -> Result<i64, LookupError> {
        self.get(id).await?.ok_or(LookupError::NotFound(id))
    }
}
