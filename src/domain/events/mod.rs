//! Domain events
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    Product(ProductEvent),
    Cart(CartEvent),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    Created { product_id: i64, sku: String },
    Updated { product_id: i64 },
    Deleted { product_id: i64 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    ItemAdded { session_id: String, product_id: i64, quantity: i64 },
    QuantitySet { session_id: String, product_id: i64, quantity: i64 },
    ItemRemoved { session_id: String, product_id: i64 },
    Cleared { session_id: String },
}

impl DomainEvent {
    /// NATS subject the event is published on.
    pub fn subject(&self) -> String {
        let (aggregate, action) = match self {
            Self::Product(ProductEvent::Created { .. }) => ("product", "created"),
            Self::Product(ProductEvent::Updated { .. }) => ("product", "updated"),
            Self::Product(ProductEvent::Deleted { .. }) => ("product", "deleted"),
            Self::Cart(CartEvent::ItemAdded { .. }) => ("cart", "item_added"),
            Self::Cart(CartEvent::QuantitySet { .. }) => ("cart", "quantity_set"),
            Self::Cart(CartEvent::ItemRemoved { .. }) => ("cart", "item_removed"),
            Self::Cart(CartEvent::Cleared { .. }) => ("cart", "cleared"),
        };
        format!("storefront.{aggregate}.{action}")
    }
}

impl From<ProductEvent> for DomainEvent {
    fn from(e: ProductEvent) -> Self { Self::Product(e) }
}

impl From<CartEvent> for DomainEvent {
    fn from(e: CartEvent) -> Self { Self::Cart(e) }
}
