//! # Storefront HTTP Client
//!
//! [`StockOracle`] and [`ProductCatalog`] over the storefront REST API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET {base}/stock/{id}     → { "id": 1, "amount": 3 }                  │
//! │  GET {base}/products/{id}  → { "id": 1, "title": "...",                │
//! │                                "price": 179.9, "image": "..." }        │
//! │  GET {base}/products       → [ product, ... ]                          │
//! │                                                                         │
//! │  404           → LookupError::NotFound                                  │
//! │  other status  → LookupError::Unavailable                               │
//! │  network/json  → LookupError::Unavailable                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices arrive as decimal numbers and are converted to cents on the way in.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use stride_core::{LookupError, Money, Product, ProductCatalog, ProductId, StockOracle};

/// `GET /stock/{id}` body.
#[derive(Debug, Deserialize)]
struct StockPayload {
    amount: i64,
}

/// `GET /products/{id}` body.
#[derive(Debug, Deserialize)]
struct ProductPayload {
    id: i64,
    title: String,
    price: f64,
    #[serde(default)]
    image: String,
}

impl From<ProductPayload> for Product {
    fn from(payload: ProductPayload) -> Self {
        Product {
            id: ProductId(payload.id),
            title: payload.title,
            price_cents: Money::from_decimal(payload.price).cents(),
            image: payload.image,
        }
    }
}

/// Client for the storefront stock and catalog API.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: String,
}

impl StorefrontClient {
    /// Builds a client with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::config(format!("Could not build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(StorefrontClient { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn stock_url(&self, id: ProductId) -> String {
        format!("{}/stock/{}", self.base_url, id)
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/products/{}", self.base_url, id)
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    /// GETs a JSON body. A 404 is `Ok(None)`.
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, LookupError> {
        debug!(url, "Storefront request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Unavailable(format!(
                "{} returned {}",
                url, status
            )));
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| LookupError::Unavailable(format!("invalid response from {}: {}", url, e)))?;

        Ok(Some(body))
    }

    /// Lists the catalog, truncated to `limit` entries.
    pub async fn list_products(&self, limit: u32) -> Result<Vec<Product>, LookupError> {
        let url = self.products_url();
        let payloads: Vec<ProductPayload> = self
            .fetch(&url)
            .await?
            .ok_or_else(|| LookupError::Unavailable(format!("{} returned 404", url)))?;

        Ok(payloads
            .into_iter()
            .take(limit as usize)
            .map(Product::from)
            .collect())
    }
}

#[async_trait]
impl StockOracle for StorefrontClient {
    async fn available(&self, id: ProductId) -> Result<i64, LookupError> {
        let stock: Option<StockPayload> = self.fetch(&self.stock_url(id)).await?;
        stock.map(|s| s.amount).ok_or(LookupError::NotFound(id))
    }
}

#[async_trait]
impl ProductCatalog for StorefrontClient {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        let product: Option<ProductPayload> = self.fetch(&self.product_url(id)).await?;
        product.map(Product::from).ok_or(LookupError::NotFound(id))
    }
}
