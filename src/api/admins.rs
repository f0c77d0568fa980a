//! Back-office accounts. Every route is admin-gated and no response carries a
//! password or its hash.

use super::{AdminClaims, AppState};
use crate::domain::aggregates::admin::hash_password;
use crate::domain::aggregates::{AdminUser, NewAdmin, PasswordChange};
use crate::{Result, StorefrontError};
use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde_json::{json, Value};
use validator::Validate;

/// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_off_thread(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| StorefrontError::StorageError(format!("password hashing task failed: {e}")))?
}

pub async fn list_admins(State(s): State<AppState>, _: AdminClaims) -> Result<Json<Vec<AdminUser>>> {
    Ok(Json(s.admins.list().await?))
}

pub async fn create_admin(State(s): State<AppState>, AdminClaims(actor): AdminClaims, Json(r): Json<NewAdmin>) -> Result<(StatusCode, Json<AdminUser>)> {
    r.validate()?;
    let hash = hash_off_thread(r.password).await?;
    let admin = s.admins.create(r.email.trim(), &hash).await?;
    tracing::info!(admin_id = admin.id, actor = %actor.email, "admin account created");
    Ok((StatusCode::CREATED, Json(admin)))
}

pub async fn change_password(State(s): State<AppState>, AdminClaims(actor): AdminClaims, Path(id): Path<i64>, Json(r): Json<PasswordChange>) -> Result<Json<Value>> {
    r.validate()?;
    let hash = hash_off_thread(r.password).await?;
    if !s.admins.set_password(id, &hash).await? {
        return Err(StorefrontError::AdminNotFound);
    }
    tracing::info!(admin_id = id, actor = %actor.email, "admin password changed");
    Ok(Json(json!({ "message": "Password updated" })))
}
