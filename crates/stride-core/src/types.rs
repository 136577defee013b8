//! # Domain Types
//!
//! Core domain types for the cart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartItem     │   │      Cart       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │──►│  [CartItem]     │       │
//! │  │  title          │   │  title (frozen) │   │  unique by id   │       │
//! │  │  price_cents    │   │  price (frozen) │   │  insertion      │       │
//! │  │  image          │   │  quantity ≥ 1   │   │  order          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │                        ┌─────────────────┐                              │
//! │                        │   CartTotals    │  derived, read-only          │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Format
//! A `Cart` serializes as a bare JSON array of items, in cart order:
//! ```json
//! [{ "id": 1, "title": "Tênis", "priceCents": 17990, "image": "…",
//!    "quantity": 2, "addedAt": "2024-05-01T12:00:00Z" }]
//! ```
//!
//! Items saved by the web storefront decode too. They carry a decimal
//! `price`, call the quantity `amount` and have no `addedAt`:
//! ```json
//! [{ "id": 1, "title": "Tênis", "price": 179.9, "image": "…", "amount": 2 }]
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Id
// =============================================================================

/// Integer product identifier shared by the catalog, the stock service and
/// the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Returns the raw integer id.
    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as served by the catalog.
///
/// Everything except `id` is opaque to the cart rules: it is copied into the
/// cart item and displayed, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    /// Display name.
    pub title: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Image URL.
    pub image: String,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the cart.
///
/// Product attributes are frozen when the item is first added. Later
/// additions of the same product only bump `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub price_cents: i64,
    pub image: String,

    /// Quantity in cart, always ≥ 1 in a committed cart.
    pub quantity: i64,

    /// When the product first entered the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a cart item from a catalog product.
    pub fn from_product(product: Product, quantity: i64) -> Self {
        CartItem {
            id: product.id,
            title: product.title,
            price_cents: product.price_cents,
            image: product.image,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Returns the unit price.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price() * self.quantity
    }
}

/// A cart item as found in a snapshot, in either the native or the web
/// storefront's shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCartItem {
    id: ProductId,
    title: String,
    price_cents: Option<i64>,
    price: Option<f64>,
    #[serde(default)]
    image: String,
    #[serde(alias = "amount")]
    quantity: i64,
    #[serde(default = "Utc::now")]
    added_at: DateTime<Utc>,
}

impl<'de> Deserialize<'de> for CartItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredCartItem::deserialize(deserializer)?;
        let price_cents = match (stored.price_cents, stored.price) {
            (Some(cents), _) => cents,
            (None, Some(price)) => Money::from_decimal(price).cents(),
            (None, None) => return Err(de::Error::missing_field("priceCents")),
        };

        Ok(CartItem {
            id: stored.id,
            title: stored.title,
            price_cents,
            image: stored.image,
            quantity: stored.quantity,
            added_at: stored.added_at,
        })
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered collection of cart items, unique by id.
///
/// Readers only ever see a `Cart` behind an `Arc` handed out by
/// [`CartManager`](crate::manager::CartManager), so the mutators are
/// crate-private: the manager edits a private copy and swaps it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart(Vec<CartItem>);

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart(Vec::new())
    }

    /// Items in cart order.
    pub fn items(&self) -> &[CartItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.0.iter()
    }

    /// Looks up an item by product id.
    pub fn find(&self, id: ProductId) -> Option<&CartItem> {
        self.0.iter().find(|item| item.id == id)
    }

    /// Quantity of `id` in the cart, or 0 when absent.
    pub fn quantity_of(&self, id: ProductId) -> i64 {
        self.find(id).map_or(0, |item| item.quantity)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all quantities, saturating at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.0
            .iter()
            .fold(0i64, |total, item| total.saturating_add(item.quantity))
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money {
        self.0.iter().map(CartItem::line_total).sum()
    }

    /// Sets the quantity of an existing item in place.
    ///
    /// Returns `false` when the product is not in the cart.
    pub(crate) fn set_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        match self.0.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Appends a new item at the end.
    pub(crate) fn push(&mut self, item: CartItem) {
        self.0.push(item);
    }

    /// Removes an item, keeping the order of the rest.
    pub(crate) fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.0.iter().position(|item| item.id == id)?;
        Some(self.0.remove(index))
    }
}

impl From<Vec<CartItem>> for Cart {
    /// Wraps items as-is; use [`validate_cart`](crate::validation::validate_cart)
    /// before trusting the result.
    fn from(items: Vec<CartItem>) -> Self {
        Cart(items)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: cart.subtotal().cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price_cents: i64) -> Product {
        Product {
            id: ProductId(id),
            title: format!("Tênis {}", id),
            price_cents,
            image: format!("https://img.example/{}.jpg", id),
        }
    }

    #[test]
    fn test_cart_item_freezes_product_attributes() {
        let item = CartItem::from_product(product(1, 17990), 1);
        assert_eq!(item.id, ProductId(1));
        assert_eq!(item.title, "Tênis 1");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price().cents(), 17990);
    }

    #[test]
    fn test_cart_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.push(CartItem::from_product(product(3, 100), 1));
        cart.push(CartItem::from_product(product(1, 100), 1));
        cart.push(CartItem::from_product(product(2, 100), 1));

        assert!(cart.set_quantity(ProductId(1), 4));
        let ids: Vec<i64> = cart.iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        cart.remove(ProductId(1));
        let ids: Vec<i64> = cart.iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_set_quantity_missing_item() {
        let mut cart = Cart::new();
        assert!(!cart.set_quantity(ProductId(9), 2));
        assert!(cart.remove(ProductId(9)).is_none());
        assert_eq!(cart.quantity_of(ProductId(9)), 0);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.push(CartItem::from_product(product(1, 17990), 2));
        cart.push(CartItem::from_product(product(2, 13990), 1));

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal_cents, 17990 * 2 + 13990);
    }

    #[test]
    fn test_cart_serializes_as_item_array() {
        let mut cart = Cart::new();
        cart.push(CartItem::from_product(product(1, 17990), 2));

        let value = serde_json::to_value(&cart).unwrap();
        let items = value.as_array().expect("cart is a JSON array");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], 1);
        assert_eq!(items[0]["quantity"], 2);
        assert_eq!(items[0]["priceCents"], 17990);

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_decodes_web_storefront_snapshot() {
        let payload = r#"[
            {"id": 1, "title": "Tênis", "price": 179.9, "image": "a.jpg", "amount": 2},
            {"id": 3, "title": "Tênis Duramo", "price": 219.9, "image": "b.jpg", "amount": 1,
             "priceFormatted": "R$ 219,90"}
        ]"#;

        let cart: Cart = serde_json::from_str(payload).unwrap();

        assert_eq!(cart.len(), 2);
        let first = &cart.items()[0];
        assert_eq!(first.id, ProductId(1));
        assert_eq!(first.price_cents, 17990);
        assert_eq!(first.quantity, 2);
        assert_eq!(first.image, "a.jpg");
        assert_eq!(cart.quantity_of(ProductId(3)), 1);
        assert_eq!(cart.subtotal().cents(), 2 * 17990 + 21990);
    }

    #[test]
    fn test_snapshot_item_without_price_is_rejected() {
        let payload = r#"[{"id": 1, "title": "Tênis", "image": "", "quantity": 1}]"#;
        let err = serde_json::from_str::<Cart>(payload).unwrap_err();
        assert!(err.to_string().contains("priceCents"));
    }
}
