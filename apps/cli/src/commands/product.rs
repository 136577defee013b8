//! # Product Commands
//!
//! `products`: the catalog with current stock, from whichever backend is
//! active.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, Storefront};
use stride_core::Product;

/// A catalog entry with its stock level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,

    /// `None` when the stock lookup failed for this product.
    pub available: Option<i64>,
}

/// Lists products with their available stock.
pub async fn list_products(
    storefront: &Storefront,
    limit: u32,
) -> Result<Vec<ProductListing>, ApiError> {
    debug!(limit, "list_products command");

    let products = storefront.list_products(limit).await?;
    let stock = storefront.stock();

    let mut listings = Vec::with_capacity(products.len());
    for product in products {
        let available = stock.available(product.id).await.ok();
        listings.push(ProductListing { product, available });
    }
    Ok(listings)
}

/// Renders listings as a plain-text table.
pub fn render_products(listings: &[ProductListing], config: &ConfigState) -> String {
    if listings.is_empty() {
        return "No products\n".to_string();
    }

    listings
        .iter()
        .map(|l| {
            let stock = match l.available {
                Some(0) => "out of stock".to_string(),
                Some(n) => format!("{} in stock", n),
                None => "stock unknown".to_string(),
            };
            format!(
                "#{:<4} {:<48} {:>11}  {}\n",
                l.product.id.get(),
                l.product.title,
                config.format_currency(l.product.price_cents),
                stock
            )
        })
        .collect()
}
