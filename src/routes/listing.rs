use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::listing::{DisplayItem, RawListing};
use crate::models::search::{FilterState, SortOption};
use crate::services::listing_search_service::ListingSearchService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default)]
    pub sort: SortOption,
}

/// Query string form of the browse filters; list filters are comma-separated.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    #[serde(flatten)]
    pub filters: FilterState,
    pub sort: Option<String>,
}

pub fn normalize_all(listings: &[RawListing]) -> Vec<DisplayItem> {
    listings.iter().map(RawListing::normalize).collect()
}

/*
    /api/listings/normalize
*/
pub async fn normalize_listings(input: web::Json<Vec<Value>>) -> impl Responder {
    let listings = RawListing::from_values(input.into_inner());
    HttpResponse::Ok().json(normalize_all(&listings))
}

/*
    /api/listings/search
*/
pub async fn search_listings(input: web::Json<SearchRequest>) -> impl Responder {
    let request = input.into_inner();
    let listings = RawListing::from_values(request.items);

    let results = ListingSearchService::process(normalize_all(&listings), &request.filters, request.sort);
    HttpResponse::Ok().json(results)
}

/*
    /api/listings?searchTerm=&searchType=&types=&months=&durations=&minPrice=&maxPrice=&excludeFlexible=&sort=
*/
pub async fn get_listings(
    state: web::Data<AppState>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse, AppError> {
    let ListingQuery { filters, sort } = query.into_inner();

    let sort = match sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<SortOption>().map_err(AppError::BadRequest)?,
        None => SortOption::default(),
    };

    let listings = state.catalog.fetch_all().await?;
    let results = ListingSearchService::process(normalize_all(&listings), &filters, sort);

    log::debug!("Listing query matched {} of {} items", results.len(), listings.len());

    Ok(HttpResponse::Ok().json(results))
}
