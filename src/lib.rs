//! Storefront
//!
//! Catalog, cart and back-office API for a small retail storefront.
//!
//! ## Features
//! - Catalog queries (category, promotion and search filters, sorting, pagination)
//! - Cart store with optimistic, best-effort persistence
//! - Product, hero slide, page banner and admin account management behind a bearer-token gate
//! - In-memory or Postgres storage

pub mod api;
pub mod config;
pub mod domain;
pub mod repository;
pub mod services;

pub use domain::aggregates::{Cart, CartItem, NewProduct, Product};
pub use domain::catalog::{CatalogPage, CatalogQuery, CategoryFilter, SortDirection, SortKey};
pub use domain::value_objects::{format_price, parse_price, Money};
pub use services::cart_store::{CartSnapshot, CartStore};

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Slide not found")]
    SlideNotFound,

    #[error("Admin not found")]
    AdminNotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid quantity")]
    InvalidQuantity,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing bearer token")]
    Unauthorized,

    #[error("Invalid or expired token")]
    Forbidden,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<sqlx::Error> for StorefrontError {
    fn from(e: sqlx::Error) -> Self { Self::StorageError(e.to_string()) }
}

impl From<validator::ValidationErrors> for StorefrontError {
    fn from(e: validator::ValidationErrors) -> Self { Self::InvalidInput(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
