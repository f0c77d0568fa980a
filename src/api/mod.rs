//! HTTP surface: catalog, cart and back-office routes.

use crate::repository::{AdminRepository, CartRepository, ContentRepository, ProductStore};
use crate::services::EventPublisher;
use crate::StorefrontError;
use axum::{http::StatusCode, response::{IntoResponse, Response}, routing::{get, put}, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod admins;
pub mod auth;
pub mod cart;
pub mod content;
pub mod products;

pub use auth::{AdminClaims, AuthKeys};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
    pub carts: Arc<dyn CartRepository>,
    pub content: Arc<dyn ContentRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub events: EventPublisher,
    pub auth: AuthKeys,
    pub page_size: usize,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub total_pages: u32,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/products", get(products::list_products).post(products::create_product))
        .route("/products/categories", get(products::list_categories))
        .route("/products/:id", get(products::get_product).put(products::update_product).delete(products::delete_product))
        .route("/cart/:session", get(cart::get_cart).post(cart::add_to_cart).delete(cart::clear_cart))
        .route("/cart/:session/:product_id", put(cart::set_quantity).delete(cart::remove_item))
        .route("/slides", get(content::list_slides).post(content::create_slide))
        .route("/slides/:id", put(content::update_slide).delete(content::delete_slide))
        .route("/page-banners", get(content::list_banners).put(content::upsert_banner))
        .route("/admins", get(admins::list_admins).post(admins::create_admin))
        .route("/admins/:id/password", put(admins::change_password));

    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront"})) }))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

impl StorefrontError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ProductNotFound | Self::SlideNotFound | Self::AdminNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::InvalidQuantity | Self::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
