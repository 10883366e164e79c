//! Shopping cart priced from catalog records.
//!
//! A cart only reads products: adding a line snapshots the product's price at that
//! moment. Carts are never written to the store.

use serde::{Deserialize, Serialize};

use super::Product;

/// One line of a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// An ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product`.
    ///
    /// A product already in the cart has its line's quantity increased; the price
    /// captured when the line was first added is kept.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.row_key)
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }
        self.items.push(CartItem {
            product_id: product.row_key.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
        });
    }

    /// Drops the line for `product_id`. Returns the removed line, if any.
    pub fn remove(&mut self, product_id: &str) -> Option<CartItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Sum of price times quantity over every line.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(row_key: &str, name: &str, price: f64) -> Product {
        Product {
            partition_key: "Product".to_string(),
            row_key: row_key.to_string(),
            name: name.to_string(),
            description: None,
            price,
            stock_level: 100,
            image_ref: None,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_cart_totals_zero() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), 0.0);
    }

    #[test]
    fn total_follows_every_mutation() {
        let widget = product("0", "Widget", 9.99);
        let gadget = product("1", "Gadget", 4.50);
        let mut cart = Cart::new();

        cart.add(&widget, 2);
        assert!(close(cart.total_price(), 19.98));

        cart.add(&gadget, 1);
        assert!(close(cart.total_price(), 24.48));

        cart.items[1].quantity = 3;
        assert!(close(cart.total_price(), 33.48));

        cart.remove("0");
        assert!(close(cart.total_price(), 13.50));
    }

    #[test]
    fn adding_same_product_merges_lines() {
        let widget = product("0", "Widget", 2.0);
        let mut cart = Cart::new();
        cart.add(&widget, 1);
        cart.add(&widget, 4);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert!(close(cart.total_price(), 10.0));
    }

    #[test]
    fn price_is_snapshotted_on_add() {
        let mut widget = product("0", "Widget", 2.0);
        let mut cart = Cart::new();
        cart.add(&widget, 1);

        widget.price = 50.0;
        cart.add(&widget, 1);
        assert!(close(cart.total_price(), 4.0));
    }

    #[test]
    fn removing_unknown_line_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add(&product("0", "Widget", 1.0), 1);
        assert!(cart.remove("7").is_none());
        assert_eq!(cart.items.len(), 1);
    }
}
