use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::lenient::optional_datetime;
use crate::models::pricing::{EarlyBirdOutcome, EarlyBookingPolicy, PriceBreakdown, PricingConfig};
use crate::services::{discount_service::DiscountService, pricing_service::PricingService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub early_booking: EarlyBookingPolicy,
    /// Evaluate the early-bird window at this instant instead of the server clock.
    #[serde(default, deserialize_with = "optional_datetime")]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub breakdown: PriceBreakdown,
    pub early_bird: EarlyBirdOutcome,
    pub final_price: f64,
}

pub fn quote(request: &QuoteRequest) -> QuoteResponse {
    let now = request.now.unwrap_or_else(Utc::now);
    let breakdown = PricingService::calculate_breakdown(&request.pricing);
    let early_bird = DiscountService::apply_early_bird(breakdown.total, &request.early_booking, now);

    QuoteResponse {
        final_price: early_bird.final_price,
        breakdown,
        early_bird,
    }
}

/*
    /api/pricing/quote
*/
pub async fn create_quote(input: web::Json<QuoteRequest>) -> impl Responder {
    HttpResponse::Ok().json(quote(&input.into_inner()))
}
