//! Catalog routes. Listing runs the catalog query engine over the full product
//! set; writes require an admin token.

use super::{AdminClaims, AppState, PaginatedResponse};
use crate::domain::aggregates::{NewProduct, Product};
use crate::domain::catalog::{self, CatalogQuery, CategoryFilter, SortDirection, SortKey};
use crate::domain::events::ProductEvent;
use crate::{Result, StorefrontError};
use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub promotions: Option<bool>,
    pub sort: Option<SortKey>,
    pub direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub per_page: Option<usize>,
    /// Product to jump to; its page wins over `page` when it is visible.
    pub target: Option<i64>,
}

impl CatalogParams {
    fn to_query(&self) -> CatalogQuery {
        CatalogQuery {
            search_term: self.search.clone().unwrap_or_default(),
            category: self.category.as_deref().map(CategoryFilter::from).unwrap_or_default(),
            promotions_only: self.promotions.unwrap_or(false),
            sort_key: self.sort,
            sort_direction: self.direction.unwrap_or_default(),
            page: self.page.unwrap_or(1).max(1),
            target_product_id: self.target,
        }
    }
}

pub async fn list_products(State(s): State<AppState>, Query(p): Query<CatalogParams>) -> Result<Json<PaginatedResponse<Product>>> {
    let per_page = p.per_page.unwrap_or(s.page_size).clamp(1, MAX_PER_PAGE);
    let products = s.products.list().await?;
    let result = catalog::run(&products, &p.to_query(), per_page);
    Ok(Json(PaginatedResponse { data: result.items, total: result.total_items, page: result.page, total_pages: result.total_pages }))
}

pub async fn list_categories(State(s): State<AppState>) -> Result<Json<Vec<String>>> {
    let products = s.products.list().await?;
    Ok(Json(catalog::list_categories(&products).iter().map(ToString::to_string).collect()))
}

pub async fn get_product(State(s): State<AppState>, Path(id): Path<i64>) -> Result<Json<Product>> {
    s.products.get(id).await?.map(Json).ok_or(StorefrontError::ProductNotFound)
}

pub async fn create_product(State(s): State<AppState>, AdminClaims(admin): AdminClaims, Json(r): Json<NewProduct>) -> Result<(StatusCode, Json<Product>)> {
    r.validate()?;
    let product = s.products.create(r).await?;
    tracing::info!(product_id = product.id, admin = %admin.email, "product created");
    s.events.publish(ProductEvent::Created { product_id: product.id, sku: product.sku.clone() }).await;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(State(s): State<AppState>, AdminClaims(admin): AdminClaims, Path(id): Path<i64>, Json(r): Json<NewProduct>) -> Result<Json<Product>> {
    r.validate()?;
    let product = s.products.update(id, r).await?.ok_or(StorefrontError::ProductNotFound)?;
    tracing::info!(product_id = id, admin = %admin.email, "product updated");
    s.events.publish(ProductEvent::Updated { product_id: id }).await;
    Ok(Json(product))
}

pub async fn delete_product(State(s): State<AppState>, AdminClaims(admin): AdminClaims, Path(id): Path<i64>) -> Result<StatusCode> {
    s.products.delete(id).await?;
    tracing::info!(product_id = id, admin = %admin.email, "product deleted");
    s.events.publish(ProductEvent::Deleted { product_id: id }).await;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_to_query() {
        let params: CatalogParams = serde_json::from_value(serde_json::json!({
            "search": "kit", "category": "All", "sort": "price", "direction": "desc", "page": 0
        })).unwrap();
        let query = params.to_query();
        assert_eq!(query.category, CategoryFilter::All);
        assert_eq!(query.sort_key, Some(SortKey::Price));
        assert_eq!(query.sort_direction, SortDirection::Desc);
        assert_eq!(query.page, 1);
        assert!(!query.promotions_only);
    }
}
