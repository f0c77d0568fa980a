//! Aggregates module
pub mod product;
pub mod cart;
pub mod admin;

pub use product::{NewProduct, Product};
pub use cart::{Cart, CartItem, MAX_LINE_QUANTITY};
pub use admin::{AdminUser, NewAdmin, PasswordChange};
