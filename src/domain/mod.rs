//! Storefront domain: products, carts, catalog queries and domain events.
pub mod aggregates;
pub mod catalog;
pub mod content;
pub mod events;
pub mod value_objects;
