use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;
use storefront::api::{auth::Claims, router, AppState, AuthKeys};
use storefront::repository::{MemoryAdminRepository, MemoryCartRepository, MemoryContentRepository, MemoryProductRepository};
use storefront::services::EventPublisher;
use storefront::{Money, Product};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn seed() -> Vec<Product> {
    vec![
        Product::new(1, "Alpha", "A", Money::parse("R$ 10,00")),
        Product::new(2, "Beta", "B", Money::parse("R$ 5,00")),
        Product::new(3, "Gamma", "A", Money::parse("R$ 20,00")),
    ]
}

fn app_with(products: Vec<Product>) -> Router {
    router(AppState {
        products: Arc::new(MemoryProductRepository::with_products(products)),
        carts: Arc::new(MemoryCartRepository::new()),
        content: Arc::new(MemoryContentRepository::new()),
        admins: Arc::new(MemoryAdminRepository::new()),
        events: EventPublisher::disabled(),
        auth: AuthKeys::from_secret(SECRET),
        page_size: 12,
    })
}

fn admin_token() -> String {
    let exp = (chrono::Utc::now().timestamp() + 3600) as usize;
    let claims = Claims { id: 1, email: "admin@loja.com".into(), exp };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(b.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn names(page: &Value) -> Vec<String> {
    page["data"].as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap().to_string()).collect()
}

#[tokio::test]
async fn catalog_filters_sorts_and_paginates() {
    let app = app_with(seed());
    let (status, page) = call(&app, Method::GET, "/api/products?category=A&sort=price&direction=asc&page=1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&page), ["Alpha", "Gamma"]);
    assert_eq!(page["total_pages"], 1);
    assert_eq!(page["total"], 2);
    assert_eq!(page["data"][0]["price"], "R$ 10,00");
}

#[tokio::test]
async fn catalog_search_matches_product_id() {
    let app = app_with(seed());
    let (_, page) = call(&app, Method::GET, "/api/products?search=2", None, None).await;
    assert_eq!(names(&page), ["Beta"]);
}

#[tokio::test]
async fn catalog_deep_links_to_target_page() {
    let products = (1..=13).map(|i| Product::new(i, format!("Item {i}"), "X", Money::parse("R$ 1,00"))).collect();
    let app = app_with(products);
    let (_, first) = call(&app, Method::GET, "/api/products?sort=name", None, None).await;
    assert_eq!(first["total_pages"], 2);
    assert_eq!(first["data"].as_array().unwrap().len(), 12);

    let (_, third) = call(&app, Method::GET, "/api/products?page=3", None, None).await;
    assert!(third["data"].as_array().unwrap().is_empty());

    // Listing is newest first, so id 1 sits last.
    let (_, target) = call(&app, Method::GET, "/api/products?target=1", None, None).await;
    assert_eq!(target["page"], 2);
    assert_eq!(names(&target), ["Item 1"]);
}

#[tokio::test]
async fn categories_start_with_all() {
    let app = app_with(seed());
    let (_, cats) = call(&app, Method::GET, "/api/products/categories", None, None).await;
    assert_eq!(cats, json!(["All", "A", "B"]));
}

#[tokio::test]
async fn product_writes_require_admin_token() {
    let app = app_with(vec![]);
    let body = json!({ "name": "Kit Neon", "category": "Kits", "price": "R$ 199,90", "sku": "RAY-002" });

    let (status, _) = call(&app, Method::POST, "/api/products", Some(body.clone()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, Method::POST, "/api/products", Some(body.clone()), Some("garbage")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = admin_token();
    let (status, created) = call(&app, Method::POST, "/api/products", Some(body), Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"], "R$ 199,90");
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = call(&app, Method::GET, &format!("/api/products/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Kit Neon");

    let (status, _) = call(&app, Method::DELETE, &format!("/api/products/{id}"), None, Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, err) = call(&app, Method::GET, &format!("/api/products/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "Product not found");
}

#[tokio::test]
async fn invalid_product_is_rejected() {
    let app = app_with(vec![]);
    let body = json!({ "name": "", "category": "Kits", "price": "R$ 1,00" });
    let (status, _) = call(&app, Method::POST, "/api/products", Some(body), Some(&admin_token())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = call(&app, Method::PUT, "/api/products/99", Some(json!({ "name": "x", "category": "y", "price": 1 })), Some(&admin_token())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_merges_updates_and_clears() {
    let app = app_with(seed());
    let (status, cart) = call(&app, Method::POST, "/api/cart/s1", Some(json!({ "product_id": 1, "quantity": 2 })), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cart["item_count"], 2);

    call(&app, Method::POST, "/api/cart/s1", Some(json!({ "product_id": 1 })), None).await;
    let (_, cart) = call(&app, Method::POST, "/api/cart/s1", Some(json!({ "product_id": 2, "quantity": 1 })), None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["items"][0]["quantity"], 3);
    assert_eq!(cart["item_count"], 4);
    assert_eq!(cart["total_price"], "R$ 35,00");

    let (_, cart) = call(&app, Method::PUT, "/api/cart/s1/1", Some(json!({ "quantity": 0 })), None).await;
    assert_eq!(cart["item_count"], 1);
    assert_eq!(cart["items"][0]["id"], 2);

    let (_, other) = call(&app, Method::GET, "/api/cart/s2", None, None).await;
    assert_eq!(other["item_count"], 0);

    let (status, _) = call(&app, Method::DELETE, "/api/cart/s1", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, cart) = call(&app, Method::GET, "/api/cart/s1", None, None).await;
    assert_eq!(cart["item_count"], 0);
    assert_eq!(cart["total_price"], "R$ 0,00");
}

#[tokio::test]
async fn cart_rejects_bad_input() {
    let app = app_with(seed());
    let (status, _) = call(&app, Method::POST, "/api/cart/s1", Some(json!({ "product_id": 1, "quantity": 0 })), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = call(&app, Method::POST, "/api/cart/s1", Some(json!({ "product_id": 42 })), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn banners_and_slides() {
    let app = app_with(vec![]);
    let banner = json!({ "pageId": "catalog", "imageUrl": "https://cdn/b.jpg", "title": "Catálogo" });
    let (status, _) = call(&app, Method::PUT, "/api/page-banners", Some(banner.clone()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, Method::PUT, "/api/page-banners", Some(banner), Some(&admin_token())).await;
    assert_eq!(status, StatusCode::OK);
    let (_, banners) = call(&app, Method::GET, "/api/page-banners", None, None).await;
    assert_eq!(banners[0]["pageId"], "catalog");

    let slide = json!({ "imageUrl": "https://cdn/s.jpg", "title": "Novidades", "buttonText": "Ver" });
    let (status, created) = call(&app, Method::POST, "/api/slides", Some(slide), Some(&admin_token())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    let (status, _) = call(&app, Method::PUT, "/api/slides/9", Some(json!({ "imageUrl": "u", "title": "t" })), Some(&admin_token())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_accounts_never_expose_passwords() {
    let app = app_with(vec![]);
    let token = admin_token();
    let body = json!({ "email": "gerente@loja.com", "password": "segredo123" });

    let (status, _) = call(&app, Method::GET, "/api/admins", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = call(&app, Method::POST, "/api/admins", Some(body.clone()), Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({ "id": 1, "email": "gerente@loja.com" }));
    let (status, _) = call(&app, Method::POST, "/api/admins", Some(body), Some(&token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(&app, Method::POST, "/api/admins", Some(json!({ "email": "nope", "password": "segredo123" })), Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, listed) = call(&app, Method::GET, "/api/admins", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([{ "id": 1, "email": "gerente@loja.com" }]));

    let (status, reply) = call(&app, Method::PUT, "/api/admins/1/password", Some(json!({ "password": "nova-senha" })), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["message"], "Password updated");
    let (status, _) = call(&app, Method::PUT, "/api/admins/9/password", Some(json!({ "password": "nova-senha" })), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bearer_scheme_is_case_insensitive() {
    let app = app_with(vec![]);
    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/admins")
        .header(header::AUTHORIZATION, format!("bearer {}", admin_token()))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn huge_cart_total_saturates() {
    let app = app_with(vec![Product::new(1, "Joia", "Luxo", Money::parse("R$ 100.000.000.000.000.000.000,00"))]);
    call(&app, Method::POST, "/api/cart/s1", Some(json!({ "product_id": 1, "quantity": i64::MAX })), None).await;
    let (status, cart) = call(&app, Method::POST, "/api/cart/s1", Some(json!({ "product_id": 1, "quantity": i64::MAX })), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cart["item_count"], 2147483647u64);
    assert!(cart["total_price"].as_str().unwrap().starts_with("R$ 79.228"));
}

#[tokio::test]
async fn health() {
    let (status, body) = call(&app_with(vec![]), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
