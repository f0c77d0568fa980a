//! Postgres repositories (`sqlx`). Schema lives in `migrations/`.

use super::{AdminRepository, CartRepository, ContentRepository, ProductSource, ProductStore};
use crate::domain::aggregates::{AdminUser, CartItem, NewProduct, Product, MAX_LINE_QUANTITY};
use crate::domain::content::{HeroSlide, NewSlide, PageBanner};
use crate::domain::value_objects::Money;
use crate::{Result, StorefrontError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64, name: String, sku: String, category: String, price: Decimal, original_price: Option<Decimal>,
    image_url: String, images: Vec<String>, description: String, short_description: Option<String>,
    is_promotion: bool,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        let images = if r.images.is_empty() && !r.image_url.is_empty() { vec![r.image_url.clone()] } else { r.images };
        Product {
            id: r.id, name: r.name, category: r.category, price: Money::new(r.price),
            original_price: r.original_price.map(Money::new), sku: r.sku, image_url: r.image_url, images,
            description: r.description, short_description: r.short_description, is_promotion: r.is_promotion,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow { quantity: i32, product: Json<Product> }

#[derive(Debug, sqlx::FromRow)]
struct SlideRow { id: i64, image_url: String, title: String, subtitle: String, button_text: String }

impl From<SlideRow> for HeroSlide {
    fn from(r: SlideRow) -> Self {
        HeroSlide { id: r.id, image_url: r.image_url, title: r.title, subtitle: r.subtitle, button_text: r.button_text }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BannerRow { page_id: String, image_url: String, title: String, subtitle: String }

impl From<BannerRow> for PageBanner {
    fn from(r: BannerRow) -> Self { PageBanner { page_id: r.page_id, image_url: r.image_url, title: r.title, subtitle: r.subtitle } }
}

#[derive(Debug, sqlx::FromRow)]
struct AdminRow { id: i64, email: String }

impl From<AdminRow> for AdminUser {
    fn from(r: AdminRow) -> Self { AdminUser { id: r.id, email: r.email } }
}

fn clamp_quantity(quantity: i64) -> i32 { quantity.clamp(0, i64::from(MAX_LINE_QUANTITY)) as i32 }

/// Merges into an existing line, capped like [`Cart::add_item`](crate::Cart::add_item).
const ADD_CART_ITEM: &str = "INSERT INTO cart_items (id, session_id, product_id, quantity, product, created_at) VALUES ($1, $2, $3, $4, $5, NOW()) \
    ON CONFLICT (session_id, product_id) DO UPDATE SET quantity = LEAST(cart_items.quantity::BIGINT + EXCLUDED.quantity, $6)";

#[derive(Clone)]
pub struct PgProductRepository { db: PgPool }

impl PgProductRepository {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

#[async_trait]
impl ProductSource for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY id DESC").fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(&self.db).await?;
        Ok(row.map(Product::from))
    }
}

#[async_trait]
impl ProductStore for PgProductRepository {
    async fn create(&self, d: NewProduct) -> Result<Product> {
        let row = sqlx::query_as::<_, ProductRow>("INSERT INTO products (name, sku, category, price, original_price, image_url, images, description, short_description, is_promotion) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *")
            .bind(&d.name).bind(&d.sku).bind(&d.category).bind(d.price.amount()).bind(d.original_price.map(|m| m.amount()))
            .bind(&d.image_url).bind(&d.images).bind(&d.description).bind(&d.short_description).bind(d.is_promotion)
            .fetch_one(&self.db).await?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, d: NewProduct) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("UPDATE products SET name = $1, sku = $2, category = $3, price = $4, original_price = $5, image_url = $6, images = $7, description = $8, short_description = $9, is_promotion = $10, updated_at = NOW() WHERE id = $11 RETURNING *")
            .bind(&d.name).bind(&d.sku).bind(&d.category).bind(d.price.amount()).bind(d.original_price.map(|m| m.amount()))
            .bind(&d.image_url).bind(&d.images).bind(&d.description).bind(&d.short_description).bind(d.is_promotion).bind(id)
            .fetch_optional(&self.db).await?;
        Ok(row.map(Product::from))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(&self.db).await?;
        Ok(())
    }
}

/// Cart lines keep a JSONB snapshot of the product taken when first added.
#[derive(Clone)]
pub struct PgCartRepository { db: PgPool }

impl PgCartRepository {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn get(&self, session: &str) -> Result<Vec<CartItem>> {
        let rows = sqlx::query_as::<_, CartItemRow>("SELECT quantity, product FROM cart_items WHERE session_id = $1 ORDER BY created_at")
            .bind(session).fetch_all(&self.db).await?;
        Ok(rows.into_iter().filter(|r| r.quantity > 0).map(|r| CartItem { product: r.product.0, quantity: r.quantity as u32 }).collect())
    }

    async fn add(&self, session: &str, product: &Product, quantity: i64) -> Result<()> {
        if quantity <= 0 { return Ok(()); }
        sqlx::query(ADD_CART_ITEM)
            .bind(Uuid::now_v7()).bind(session).bind(product.id).bind(clamp_quantity(quantity)).bind(Json(product))
            .bind(i64::from(MAX_LINE_QUANTITY))
            .execute(&self.db).await?;
        Ok(())
    }

    async fn set_quantity(&self, session: &str, product_id: i64, quantity: i64) -> Result<()> {
        if quantity <= 0 { return self.remove(session, product_id).await; }
        sqlx::query("UPDATE cart_items SET quantity = $3 WHERE session_id = $1 AND product_id = $2")
            .bind(session).bind(product_id).bind(clamp_quantity(quantity)).execute(&self.db).await?;
        Ok(())
    }

    async fn remove(&self, session: &str, product_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE session_id = $1 AND product_id = $2").bind(session).bind(product_id).execute(&self.db).await?;
        Ok(())
    }

    async fn clear(&self, session: &str) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE session_id = $1").bind(session).execute(&self.db).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgContentRepository { db: PgPool }

impl PgContentRepository {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn list_slides(&self) -> Result<Vec<HeroSlide>> {
        let rows = sqlx::query_as::<_, SlideRow>("SELECT id, image_url, title, subtitle, button_text FROM slides ORDER BY id ASC").fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(HeroSlide::from).collect())
    }

    async fn create_slide(&self, d: NewSlide) -> Result<HeroSlide> {
        let row = sqlx::query_as::<_, SlideRow>("INSERT INTO slides (image_url, title, subtitle, button_text) VALUES ($1, $2, $3, $4) RETURNING id, image_url, title, subtitle, button_text")
            .bind(&d.image_url).bind(&d.title).bind(&d.subtitle).bind(&d.button_text).fetch_one(&self.db).await?;
        Ok(row.into())
    }

    async fn update_slide(&self, id: i64, d: NewSlide) -> Result<Option<HeroSlide>> {
        let row = sqlx::query_as::<_, SlideRow>("UPDATE slides SET image_url = $1, title = $2, subtitle = $3, button_text = $4 WHERE id = $5 RETURNING id, image_url, title, subtitle, button_text")
            .bind(&d.image_url).bind(&d.title).bind(&d.subtitle).bind(&d.button_text).bind(id).fetch_optional(&self.db).await?;
        Ok(row.map(HeroSlide::from))
    }

    async fn delete_slide(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM slides WHERE id = $1").bind(id).execute(&self.db).await?;
        Ok(())
    }

    async fn list_banners(&self) -> Result<Vec<PageBanner>> {
        let rows = sqlx::query_as::<_, BannerRow>("SELECT page_id, image_url, title, subtitle FROM page_banners ORDER BY page_id").fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(PageBanner::from).collect())
    }

    async fn upsert_banner(&self, b: PageBanner) -> Result<PageBanner> {
        let row = sqlx::query_as::<_, BannerRow>("INSERT INTO page_banners (page_id, image_url, title, subtitle) VALUES ($1, $2, $3, $4) ON CONFLICT (page_id) DO UPDATE SET image_url = EXCLUDED.image_url, title = EXCLUDED.title, subtitle = EXCLUDED.subtitle RETURNING page_id, image_url, title, subtitle")
            .bind(&b.page_id).bind(&b.image_url).bind(&b.title).bind(&b.subtitle).fetch_one(&self.db).await?;
        Ok(row.into())
    }
}

#[derive(Clone)]
pub struct PgAdminRepository { db: PgPool }

impl PgAdminRepository {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn list(&self) -> Result<Vec<AdminUser>> {
        let rows = sqlx::query_as::<_, AdminRow>("SELECT id, email FROM admins ORDER BY id").fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(AdminUser::from).collect())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<AdminUser> {
        let row = sqlx::query_as::<_, AdminRow>("INSERT INTO admins (email, password_hash) VALUES ($1, $2) RETURNING id, email")
            .bind(email).bind(password_hash).fetch_one(&self.db).await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => StorefrontError::EmailTaken,
                other => other.into(),
            })?;
        Ok(row.into())
    }

    async fn set_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        let done = sqlx::query("UPDATE admins SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash).bind(id).execute(&self.db).await?;
        Ok(done.rows_affected() > 0)
    }
}
