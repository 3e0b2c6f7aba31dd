use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::raw::ItemKind;

/// The card-ready shape every listing kind is normalized into.
///
/// All fields are always populated; dates stay `None` (serialized as `null`)
/// only when the source record had no usable date.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayItem {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub location: String,
    pub destination: String,
    pub guide: String,
    pub image: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub base_price: f64,
    pub discounted_price: f64,
    pub early_bird_applied: bool,
    pub category: String,
    pub rating: f64,
    pub review_count: u32,
    pub tags: Vec<String>,
    pub duration: String,
    pub duration_days: u32,
    pub flexible: bool,
}
