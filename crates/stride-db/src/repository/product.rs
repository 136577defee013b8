//! # Product Repository
//!
//! Catalog reads and writes, and the [`ProductCatalog`] port backed by them.

use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stride_core::{LookupError, Product, ProductCatalog, ProductId};

/// Row shape of the `products` table.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    title: String,
    price_cents: i64,
    image: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            title: row.title,
            price_cents: row.price_cents,
            image: row.image,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let product = repo.get_by_id(ProductId(1)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, title, price_cents, image FROM products WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Lists products ordered by id.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, title, price_cents, image FROM products ORDER BY id LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Inserts a product, or replaces the attributes of an existing id.
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, title = %product.title, "Upserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, title, price_cents, image)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (id) DO UPDATE SET
                title = excluded.title,
                price_cents = excluded.price_cents,
                image = excluded.image
            "#,
        )
        .bind(product.id.get())
        .bind(&product.title)
        .bind(product.price_cents)
        .bind(&product.image)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a product from the catalog. Returns whether a row was removed.
    pub async fn delete(&self, id: ProductId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl ProductCatalog for ProductRepository {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.get_by_id(id).await?.ok_or(LookupError::NotFound(id))
    }
}
