//! In-process repositories. Used when no database is configured and in tests.

use super::{AdminRepository, CartRepository, ContentRepository, ProductSource, ProductStore};
use crate::domain::aggregates::{AdminUser, Cart, CartItem, NewProduct, Product};
use crate::domain::content::{HeroSlide, NewSlide, PageBanner};
use crate::{Result, StorefrontError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self { Self::default() }

    pub fn with_products(products: Vec<Product>) -> Self { Self { products: RwLock::new(products) } }
}

#[async_trait]
impl ProductSource for MemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>> {
        let mut products = self.products.read().await.clone();
        products.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(products)
    }

    async fn get(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl ProductStore for MemoryProductRepository {
    async fn create(&self, draft: NewProduct) -> Result<Product> {
        let mut products = self.products.write().await;
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let product = draft.into_product(id);
        products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: i64, draft: NewProduct) -> Result<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(slot) = products.iter_mut().find(|p| p.id == id) else { return Ok(None) };
        *slot = draft.into_product(id);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.products.write().await.retain(|p| p.id != id);
        Ok(())
    }
}

/// Carts per session, each kept as a [`Cart`] so merge rules are shared.
#[derive(Default)]
pub struct MemoryCartRepository {
    carts: RwLock<HashMap<String, Cart>>,
}

impl MemoryCartRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl CartRepository for MemoryCartRepository {
    async fn get(&self, session: &str) -> Result<Vec<CartItem>> {
        Ok(self.carts.read().await.get(session).map(|c| c.items().to_vec()).unwrap_or_default())
    }

    async fn add(&self, session: &str, product: &Product, quantity: i64) -> Result<()> {
        self.carts.write().await.entry(session.to_string()).or_default().add_item(product, quantity);
        Ok(())
    }

    async fn set_quantity(&self, session: &str, product_id: i64, quantity: i64) -> Result<()> {
        if let Some(cart) = self.carts.write().await.get_mut(session) {
            cart.update_quantity(product_id, quantity);
        }
        Ok(())
    }

    async fn remove(&self, session: &str, product_id: i64) -> Result<()> {
        if let Some(cart) = self.carts.write().await.get_mut(session) {
            cart.remove_item(product_id);
        }
        Ok(())
    }

    async fn clear(&self, session: &str) -> Result<()> {
        self.carts.write().await.remove(session);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryContentRepository {
    slides: RwLock<Vec<HeroSlide>>,
    banners: RwLock<Vec<PageBanner>>,
}

impl MemoryContentRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl ContentRepository for MemoryContentRepository {
    async fn list_slides(&self) -> Result<Vec<HeroSlide>> {
        let mut slides = self.slides.read().await.clone();
        slides.sort_by_key(|s| s.id);
        Ok(slides)
    }

    async fn create_slide(&self, draft: NewSlide) -> Result<HeroSlide> {
        let mut slides = self.slides.write().await;
        let id = slides.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let slide = draft.into_slide(id);
        slides.push(slide.clone());
        Ok(slide)
    }

    async fn update_slide(&self, id: i64, draft: NewSlide) -> Result<Option<HeroSlide>> {
        let mut slides = self.slides.write().await;
        let Some(slot) = slides.iter_mut().find(|s| s.id == id) else { return Ok(None) };
        *slot = draft.into_slide(id);
        Ok(Some(slot.clone()))
    }

    async fn delete_slide(&self, id: i64) -> Result<()> {
        self.slides.write().await.retain(|s| s.id != id);
        Ok(())
    }

    async fn list_banners(&self) -> Result<Vec<PageBanner>> { Ok(self.banners.read().await.clone()) }

    async fn upsert_banner(&self, banner: PageBanner) -> Result<PageBanner> {
        let mut banners = self.banners.write().await;
        match banners.iter_mut().find(|b| b.page_id == banner.page_id) {
            Some(existing) => *existing = banner.clone(),
            None => banners.push(banner.clone()),
        }
        Ok(banner)
    }
}

#[derive(Default)]
pub struct MemoryAdminRepository {
    admins: RwLock<Vec<(AdminUser, String)>>,
}

impl MemoryAdminRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl AdminRepository for MemoryAdminRepository {
    async fn list(&self) -> Result<Vec<AdminUser>> {
        Ok(self.admins.read().await.iter().map(|(admin, _)| admin.clone()).collect())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<AdminUser> {
        let mut admins = self.admins.write().await;
        if admins.iter().any(|(a, _)| a.email.eq_ignore_ascii_case(email)) {
            return Err(StorefrontError::EmailTaken);
        }
        let id = admins.iter().map(|(a, _)| a.id).max().unwrap_or(0) + 1;
        let admin = AdminUser { id, email: email.to_string() };
        admins.push((admin.clone(), password_hash.to_string()));
        Ok(admin)
    }

    async fn set_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        let mut admins = self.admins.write().await;
        let Some((_, stored)) = admins.iter_mut().find(|(a, _)| a.id == id) else { return Ok(false) };
        *stored = password_hash.to_string();
        Ok(true)
    }
}
