//! Storage seams for products, carts, homepage content and admin accounts.
//!
//! Implementations can be in-memory or Postgres.

use crate::domain::aggregates::{AdminUser, CartItem, NewProduct, Product};
use crate::domain::content::{HeroSlide, NewSlide, PageBanner};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;
pub mod postgres;

pub use memory::{MemoryAdminRepository, MemoryCartRepository, MemoryContentRepository, MemoryProductRepository};
pub use postgres::{PgAdminRepository, PgCartRepository, PgContentRepository, PgProductRepository};

/// Read side of the catalog.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>>;
    async fn get(&self, id: i64) -> Result<Option<Product>>;
}

/// Write side of the catalog, used by the back office.
#[async_trait]
pub trait ProductStore: ProductSource {
    async fn create(&self, draft: NewProduct) -> Result<Product>;
    /// Returns `None` when no product has this id.
    async fn update(&self, id: i64, draft: NewProduct) -> Result<Option<Product>>;
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Remote mirror of a single cart, as seen by a [`CartStore`](crate::CartStore).
#[async_trait]
pub trait CartPersistence: Send + Sync {
    async fn get(&self) -> Result<Vec<CartItem>>;
    async fn add(&self, product: &Product, quantity: i64) -> Result<()>;
    async fn set_quantity(&self, product_id: i64, quantity: i64) -> Result<()>;
    async fn remove(&self, product_id: i64) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// Server-side cart storage keyed by session.
///
/// `add` merges into an existing line and `set_quantity` at or below zero
/// removes the line, matching [`Cart`](crate::Cart).
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn get(&self, session: &str) -> Result<Vec<CartItem>>;
    async fn add(&self, session: &str, product: &Product, quantity: i64) -> Result<()>;
    async fn set_quantity(&self, session: &str, product_id: i64, quantity: i64) -> Result<()>;
    async fn remove(&self, session: &str, product_id: i64) -> Result<()>;
    async fn clear(&self, session: &str) -> Result<()>;
}

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn list_slides(&self) -> Result<Vec<HeroSlide>>;
    async fn create_slide(&self, draft: NewSlide) -> Result<HeroSlide>;
    async fn update_slide(&self, id: i64, draft: NewSlide) -> Result<Option<HeroSlide>>;
    async fn delete_slide(&self, id: i64) -> Result<()>;
    async fn list_banners(&self) -> Result<Vec<PageBanner>>;
    async fn upsert_banner(&self, banner: PageBanner) -> Result<PageBanner>;
}

/// Back-office accounts. Callers hand in password hashes, never plain text,
/// and reads never return them.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<AdminUser>>;
    /// Fails with `EmailTaken` when the email is already registered.
    async fn create(&self, email: &str, password_hash: &str) -> Result<AdminUser>;
    /// Returns `false` when no account has this id.
    async fn set_password(&self, id: i64, password_hash: &str) -> Result<bool>;
}

/// Binds one session of a [`CartRepository`] as a [`CartPersistence`].
#[derive(Clone)]
pub struct SessionCart {
    repo: Arc<dyn CartRepository>,
    session: String,
}

impl SessionCart {
    pub fn new(repo: Arc<dyn CartRepository>, session: impl Into<String>) -> Self {
        Self { repo, session: session.into() }
    }

    pub fn session(&self) -> &str { &self.session }
}

#[async_trait]
impl CartPersistence for SessionCart {
    async fn get(&self) -> Result<Vec<CartItem>> { self.repo.get(&self.session).await }
    async fn add(&self, product: &Product, quantity: i64) -> Result<()> { self.repo.add(&self.session, product, quantity).await }
    async fn set_quantity(&self, product_id: i64, quantity: i64) -> Result<()> {
        self.repo.set_quantity(&self.session, product_id, quantity).await
    }
    async fn remove(&self, product_id: i64) -> Result<()> { self.repo.remove(&self.session, product_id).await }
    async fn clear(&self) -> Result<()> { self.repo.clear(&self.session).await }
}
