//! Application services built on the domain and repository layers.
pub mod cart_store;
pub mod events;

pub use cart_store::{CartSnapshot, CartStore};
pub use events::EventPublisher;
