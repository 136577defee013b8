//! # Cart Commands
//!
//! `show`, `add`, `remove` and `set`. Every command answers with the
//! committed cart, whether or not the operation was accepted.
//!
//! ## Output
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  #1  Tênis de Caminhada Leve Confortável      2 × R$179.90   R$359.80   │
//! │  #3  Tênis Adidas Duramo Lite 2.0             1 × R$219.90   R$219.90   │
//! │  ───────────────────────────────────────────────────────────────────   │
//! │  2 products, 3 units                              Subtotal  R$579.70   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::{CartState, ConfigState};
use stride_core::{Cart, CartItem, CartTotals, ProductId};

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds one unit of a product.
pub async fn add_to_cart(cart: &CartState, product_id: i64) -> CartResponse {
    debug!(product_id, "add_to_cart command");
    cart.manager().add(ProductId(product_id)).await;
    get_cart(cart)
}

/// Removes a product line entirely.
pub async fn remove_from_cart(cart: &CartState, product_id: i64) -> CartResponse {
    debug!(product_id, "remove_from_cart command");
    cart.manager().remove(ProductId(product_id)).await;
    get_cart(cart)
}

/// Sets the quantity of a product already in the cart.
///
/// `amount <= 0` leaves the cart untouched and raises no notification.
pub async fn update_cart_item(cart: &CartState, product_id: i64, amount: i64) -> CartResponse {
    debug!(product_id, amount, "update_cart_item command");
    cart.manager()
        .update_amount(ProductId(product_id), amount)
        .await;
    get_cart(cart)
}

/// Renders a cart as a plain-text table.
pub fn render_cart(response: &CartResponse, config: &ConfigState) -> String {
    if response.items.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in &response.items {
        out.push_str(&format!(
            "#{:<4} {:<48} {:>3} × {:>10}  {:>11}\n",
            item.id.get(),
            item.title,
            item.quantity,
            config.format_currency(item.price_cents),
            config.format_currency(item.line_total().cents()),
        ));
    }

    let totals = &response.totals;
    out.push_str(&"─".repeat(84));
    out.push('\n');
    out.push_str(&format!(
        "{} {}, {} {}{:>width$}\n",
        totals.item_count,
        if totals.item_count == 1 { "product" } else { "products" },
        totals.total_quantity,
        if totals.total_quantity == 1 { "unit" } else { "units" },
        format!("Subtotal  {}", config.format_currency(totals.subtotal_cents)),
        width = 50,
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::state::TerminalNotifier;
    use stride_core::memory::{InMemoryStore, StaticInventory};
    use stride_core::{CartManager, Collaborators, Product};

    fn shoe(id: i64, price_cents: i64) -> Product {
        Product {
            id: ProductId(id),
            title: format!("Tênis {}", id),
            price_cents,
            image: String::new(),
        }
    }

    fn state() -> CartState {
        let inventory = Arc::new(
            StaticInventory::new()
                .with_product(shoe(1, 17990), 3)
                .with_product(shoe(2, 13990), 1),
        );
        let notifier = Arc::new(TerminalNotifier::new());
        let deps = Collaborators {
            stock: inventory.clone(),
            catalog: inventory,
            store: Arc::new(InMemoryStore::new()),
            notifier: notifier.clone(),
        };
        CartState::from_parts(CartManager::with_cart(deps, Cart::new()), notifier)
    }

    #[tokio::test]
    async fn test_commands_return_committed_cart() {
        let cart = state();

        add_to_cart(&cart, 1).await;
        add_to_cart(&cart, 2).await;
        let response = update_cart_item(&cart, 1, 3).await;

        assert_eq!(response.totals.item_count, 2);
        assert_eq!(response.totals.total_quantity, 4);
        assert_eq!(response.totals.subtotal_cents, 3 * 17990 + 13990);
        assert_eq!(cart.notifications(), 0);

        let response = remove_from_cart(&cart, 1).await;
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].id, ProductId(2));
    }

    #[tokio::test]
    async fn test_rejected_command_returns_unchanged_cart() {
        let cart = state();
        add_to_cart(&cart, 2).await;
        let before = get_cart(&cart);

        let after = add_to_cart(&cart, 2).await; // stock is 1
        assert_eq!(after, before);
        assert_eq!(cart.notifications(), 1);

        let after = update_cart_item(&cart, 2, 0).await;
        assert_eq!(after, before);
        assert_eq!(cart.notifications(), 1);
    }

    #[tokio::test]
    async fn test_render() {
        let config = ConfigState::default();
        let cart = state();
        assert_eq!(render_cart(&get_cart(&cart), &config), "Cart is empty\n");

        add_to_cart(&cart, 1).await;
        add_to_cart(&cart, 1).await;
        let text = render_cart(&get_cart(&cart), &config);

        assert!(text.contains("Tênis 1"));
        assert!(text.contains("R$359.80"));
        assert!(text.contains("1 product, 2 units"));
    }

    #[test]
    fn test_response_json_shape() {
        let response = CartResponse::from(&Cart::new());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["totals"]["subtotalCents"], 0);
        assert_eq!(json["totals"]["itemCount"], 0);
    }
}
