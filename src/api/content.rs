//! Hero slides and page banners. Reads are public.

use super::{AdminClaims, AppState};
use crate::domain::content::{HeroSlide, NewSlide, PageBanner};
use crate::{Result, StorefrontError};
use axum::{extract::{Path, State}, http::StatusCode, Json};
use validator::Validate;

pub async fn list_slides(State(s): State<AppState>) -> Result<Json<Vec<HeroSlide>>> {
    Ok(Json(s.content.list_slides().await?))
}

pub async fn create_slide(State(s): State<AppState>, _: AdminClaims, Json(r): Json<NewSlide>) -> Result<(StatusCode, Json<HeroSlide>)> {
    r.validate()?;
    Ok((StatusCode::CREATED, Json(s.content.create_slide(r).await?)))
}

pub async fn update_slide(State(s): State<AppState>, _: AdminClaims, Path(id): Path<i64>, Json(r): Json<NewSlide>) -> Result<Json<HeroSlide>> {
    r.validate()?;
    s.content.update_slide(id, r).await?.map(Json).ok_or(StorefrontError::SlideNotFound)
}

pub async fn delete_slide(State(s): State<AppState>, _: AdminClaims, Path(id): Path<i64>) -> Result<StatusCode> {
    s.content.delete_slide(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_banners(State(s): State<AppState>) -> Result<Json<Vec<PageBanner>>> {
    Ok(Json(s.content.list_banners().await?))
}

pub async fn upsert_banner(State(s): State<AppState>, _: AdminClaims, Json(r): Json<PageBanner>) -> Result<Json<PageBanner>> {
    r.validate()?;
    Ok(Json(s.content.upsert_banner(r).await?))
}
