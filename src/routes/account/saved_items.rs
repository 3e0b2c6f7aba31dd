use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::models::listing::DisplayItem;
use crate::routes::listing::normalize_all;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItemsResponse {
    pub user_id: String,
    pub item_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedStatus {
    pub item_id: String,
    pub saved: bool,
}

fn require_id(raw: &str, name: &str) -> Result<String, AppError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", name)));
    }
    Ok(id.to_string())
}

/*
    /api/account/{user_id}/saved
*/
pub async fn get_saved(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_id(&path.into_inner(), "user_id")?;
    let item_ids = state.saved_items.list(&user_id).await?;

    Ok(HttpResponse::Ok().json(SavedItemsResponse { user_id, item_ids }))
}

/*
    /api/account/{user_id}/saved/listings
*/
pub async fn get_saved_listings(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_id(&path.into_inner(), "user_id")?;
    let item_ids = state.saved_items.list(&user_id).await?;
    if item_ids.is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<DisplayItem>::new()));
    }

    let listings = state.catalog.fetch_all().await?;
    let mut by_id: HashMap<String, DisplayItem> = normalize_all(&listings)
        .into_iter()
        .filter(|item| !item.id.is_empty())
        .map(|item| (item.id.clone(), item))
        .collect();

    // Saved ids whose listing has since been removed are skipped
    let saved: Vec<DisplayItem> = item_ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect();

    Ok(HttpResponse::Ok().json(saved))
}

/*
    /api/account/{user_id}/saved/{item_id}
*/
pub async fn is_saved(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, item_id) = path.into_inner();
    let user_id = require_id(&user_id, "user_id")?;
    let item_id = require_id(&item_id, "item_id")?;

    let saved = state.saved_items.has(&user_id, &item_id).await?;
    Ok(HttpResponse::Ok().json(SavedStatus { item_id, saved }))
}

/*
    /api/account/{user_id}/saved/{item_id}/toggle
*/
pub async fn toggle_saved(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, item_id) = path.into_inner();
    let user_id = require_id(&user_id, "user_id")?;
    let item_id = require_id(&item_id, "item_id")?;

    let saved = state.saved_items.toggle(&user_id, &item_id).await?;
    log::info!(
        "User {} {} item {}",
        user_id,
        if saved { "saved" } else { "removed" },
        item_id
    );

    Ok(HttpResponse::Ok().json(SavedStatus { item_id, saved }))
}
