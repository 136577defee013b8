//! # Cart Snapshot Repository
//!
//! Persists the cart as one JSON payload per storage key, and implements the
//! [`DurableStore`] port on top of it.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  session start        CartRepository::load()                           │
//! │       │                 SELECT payload WHERE key = ?                   │
//! │       ▼                 → serde_json → Cart                            │
//! │  every commit         CartRepository::save(&cart)                      │
//! │       │                 Cart → serde_json → UPSERT                     │
//! │       ▼                                                                 │
//! │  next session         load() returns the exact same Cart               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stride_core::{Cart, DurableStore, StoreError};

/// Snapshot store for a single storage key.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
    key: String,
}

impl CartRepository {
    pub fn new(pool: SqlitePool, key: impl Into<String>) -> Self {
        CartRepository {
            pool,
            key: key.into(),
        }
    }

    /// The storage key this repository reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw JSON payload, if a snapshot exists.
    pub async fn load_payload(&self) -> DbResult<Option<String>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM cart_snapshots WHERE key = ?1")
                .bind(&self.key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(payload)
    }

    /// Writes a raw payload, replacing any previous one.
    pub async fn save_payload(&self, payload: &str) -> DbResult<()> {
        debug!(key = %self.key, bytes = payload.len(), "Saving cart snapshot");

        sqlx::query(
            r#"
            INSERT INTO cart_snapshots (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drops the snapshot. Returns whether one existed.
    pub async fn delete(&self) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM cart_snapshots WHERE key = ?1")
            .bind(&self.key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DurableStore for CartRepository {
    async fn load(&self) -> Result<Option<Cart>, StoreError> {
        match self.load_payload().await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let payload = serde_json::to_string(cart)?;
        self.save_payload(&payload).await?;
        Ok(())
    }
}
