use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient::{bool_or_false, lenient_vec, non_negative_f64, optional_datetime, optional_f64};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct LineItem {
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub cost: f64,
}

impl LineItem {
    pub fn new(cost: f64) -> Self {
        Self { cost }
    }
}

/// Itemised costs and percentage adjustments attached to a trip.
///
/// Percentages are whole numbers (`10.0` means 10%). `total_price`, when
/// positive, replaces the itemised computation entirely.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub accommodation_items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub transportation_items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub activity_items: Vec<LineItem>,
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub visa_reg_fee: f64,
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub custom_field: f64,
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub commission: f64,
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub pg_charges: f64,
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub buffer_percentage: f64,
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub your_fee: f64,
    #[serde(default, deserialize_with = "optional_f64")]
    pub total_price: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EarlyBookingPolicy {
    #[serde(default, deserialize_with = "bool_or_false")]
    pub allow_early_booking: bool,
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub discount_percentage: f64,
    /// `None` when the stored value is missing or unparsable.
    #[serde(default, deserialize_with = "optional_datetime")]
    pub end_date_inclusive: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub subtotal: f64,
    pub buffer_amount: f64,
    pub commission_amount: f64,
    pub pg_charges_amount: f64,
    pub your_fee: f64,
    pub total: f64,
    /// True when `totalPrice` overrode the itemised computation.
    pub overridden: bool,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EarlyBirdOutcome {
    pub applicable: bool,
    pub final_price: f64,
    pub discount_amount: f64,
}
