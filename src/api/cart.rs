//! Session cart routes, the remote mirror behind a client-side `CartStore`.

use super::AppState;
use crate::domain::aggregates::Cart;
use crate::domain::events::CartEvent;
use crate::services::CartSnapshot;
use crate::{Result, StorefrontError};
use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
    #[serde(default = "one")]
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

fn one() -> i64 { 1 }

async fn snapshot(s: &AppState, session: &str) -> Result<Json<CartSnapshot>> {
    let cart = Cart::from_items(s.carts.get(session).await?);
    Ok(Json(CartSnapshot::from(&cart)))
}

pub async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<Json<CartSnapshot>> {
    snapshot(&s, &session).await
}

pub async fn add_to_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<AddToCartRequest>) -> Result<(StatusCode, Json<CartSnapshot>)> {
    if r.quantity <= 0 {
        return Err(StorefrontError::InvalidQuantity);
    }
    let product = s.products.get(r.product_id).await?.ok_or(StorefrontError::ProductNotFound)?;
    s.carts.add(&session, &product, r.quantity).await?;
    tracing::debug!(session = %session, product_id = r.product_id, quantity = r.quantity, "cart item added");
    s.events.publish(CartEvent::ItemAdded { session_id: session.clone(), product_id: r.product_id, quantity: r.quantity }).await;
    Ok((StatusCode::CREATED, snapshot(&s, &session).await?))
}

pub async fn set_quantity(State(s): State<AppState>, Path((session, product_id)): Path<(String, i64)>, Json(r): Json<SetQuantityRequest>) -> Result<Json<CartSnapshot>> {
    s.carts.set_quantity(&session, product_id, r.quantity).await?;
    let event = if r.quantity <= 0 {
        CartEvent::ItemRemoved { session_id: session.clone(), product_id }
    } else {
        CartEvent::QuantitySet { session_id: session.clone(), product_id, quantity: r.quantity }
    };
    s.events.publish(event).await;
    snapshot(&s, &session).await
}

pub async fn remove_item(State(s): State<AppState>, Path((session, product_id)): Path<(String, i64)>) -> Result<Json<CartSnapshot>> {
    s.carts.remove(&session, product_id).await?;
    s.events.publish(CartEvent::ItemRemoved { session_id: session.clone(), product_id }).await;
    snapshot(&s, &session).await
}

pub async fn clear_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<StatusCode> {
    s.carts.clear(&session).await?;
    s.events.publish(CartEvent::Cleared { session_id: session }).await;
    Ok(StatusCode::NO_CONTENT)
}
