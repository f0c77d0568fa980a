//! Cart Aggregate

use crate::domain::aggregates::product::Product;
use crate::domain::value_objects::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest quantity a single line holds; fits a Postgres `INTEGER`.
pub const MAX_LINE_QUANTITY: u32 = i32::MAX as u32;

fn clamp_line_quantity(quantity: i64) -> u32 { u32::try_from(quantity).map_or(MAX_LINE_QUANTITY, |q| q.min(MAX_LINE_QUANTITY)) }

/// A product snapshot plus the quantity held in the cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn id(&self) -> i64 { self.product.id }
    pub fn line_total(&self) -> Money { self.product.price.multiply(self.quantity) }
}

/// Cart line items, unique by product id, every quantity >= 1.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    /// Rebuilds a cart from a persisted snapshot. Duplicate ids are merged and
    /// zero quantities dropped.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add_item(&item.product, i64::from(item.quantity));
        }
        cart
    }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn into_items(self) -> Vec<CartItem> { self.items }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn contains(&self, product_id: i64) -> bool { self.items.iter().any(|i| i.id() == product_id) }
    pub fn quantity_of(&self, product_id: i64) -> Option<u32> {
        self.items.iter().find(|i| i.id() == product_id).map(|i| i.quantity)
    }

    /// Adds `quantity` units, merging into an existing line. Non-positive
    /// quantities are ignored and reported as `false`.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> bool {
        if quantity <= 0 {
            return false;
        }
        let quantity = clamp_line_quantity(quantity);
        if let Some(existing) = self.items.iter_mut().find(|i| i.id() == product.id) {
            existing.quantity = existing.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY);
        } else {
            self.items.push(CartItem { product: product.clone(), quantity });
        }
        true
    }

    /// Sets the quantity of a line; zero or below removes it. Returns whether
    /// the cart changed.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }
        let quantity = clamp_line_quantity(quantity);
        match self.items.iter_mut().find(|i| i.id() == product_id) {
            Some(item) if item.quantity != quantity => { item.quantity = quantity; true }
            _ => false,
        }
    }

    pub fn remove_item(&mut self, product_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id() != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) { self.items.clear(); }

    pub fn item_count(&self) -> u64 { self.items.iter().map(|i| u64::from(i.quantity)).sum() }

    pub fn total(&self) -> Money { self.items.iter().map(CartItem::line_total).sum() }

    pub fn total_price(&self) -> Decimal { self.total().amount() }
}
