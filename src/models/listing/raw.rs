use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::lenient::{
    bool_or_false, f64_or_zero, fold_aliases, lenient_vec, non_negative_f64, optional_datetime,
    optional_f64, optional_id, optional_string, string_list,
};
use crate::models::pricing::{EarlyBookingPolicy, PricingConfig};

type FieldAliases = &'static [(&'static str, &'static [&'static str])];

// Older forms and imported catalogs use these spellings.
const TRIP_FIELDS: FieldAliases = &[
    ("_id", &["id"]),
    ("title", &["tripName"]),
    ("image", &["coverImage"]),
    ("startDate", &["departureDate"]),
    ("endDate", &["returnDate"]),
    ("durationDays", &["numberOfDays"]),
    ("category", &["tripType"]),
    ("ratings", &["reviews"]),
];

const EVENT_FIELDS: FieldAliases = &[
    ("_id", &["id"]),
    ("title", &["eventName"]),
    ("guide", &["organizer"]),
    ("location", &["venue"]),
    ("image", &["coverImage"]),
    ("startDate", &["eventDate"]),
    ("price", &["ticketPrice"]),
    ("category", &["eventType"]),
    ("ratings", &["reviews"]),
];

const SCHOOL_FIELDS: FieldAliases = &[
    ("_id", &["id"]),
    ("name", &["title", "schoolName"]),
    ("image", &["logo"]),
    ("ratings", &["reviews"]),
];

const PACKAGE_FIELDS: FieldAliases = &[("title", &["name"])];

const RATING_FIELDS: FieldAliases = &[("rating", &["stars"])];

const EARLY_BOOKING_FIELDS: FieldAliases = &[
    ("discountPercentage", &["earlyBookingDiscount"]),
    ("endDateInclusive", &["earlyBookingEndDate"]),
];

fn fold_each(value: &mut Value, key: &str, fields: FieldAliases) {
    if let Some(Value::Array(items)) = value.get_mut(key) {
        for item in items {
            fold_aliases(item, fields);
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Trip,
    Event,
    School,
}

impl ItemKind {
    /// Accepts the discriminants stored in `itemType` and the collection-style
    /// plurals the listing endpoints use.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "trip" | "trips" => Some(ItemKind::Trip),
            "event" | "events" => Some(ItemKind::Event),
            "school" | "schools" | "adventure" | "adventures" | "adventure-school"
            | "adventure-schools" | "adventureschool" | "package" => Some(ItemKind::School),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Trip => "Trip",
            ItemKind::Event => "Event",
            ItemKind::School => "School",
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Rating {
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub rating: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    #[serde(default, rename = "_id", deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub duration_days: Option<f64>,
    #[serde(default, deserialize_with = "optional_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub ratings: Vec<Rating>,
    #[serde(default, deserialize_with = "bool_or_false")]
    pub flexible_dates: bool,
    #[serde(flatten)]
    pub pricing: PricingConfig,
    #[serde(flatten)]
    pub early_booking: EarlyBookingPolicy,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default, rename = "_id", deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub guide: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub duration_days: Option<f64>,
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "optional_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub ratings: Vec<Rating>,
    #[serde(default, deserialize_with = "bool_or_false")]
    pub flexible_dates: bool,
    #[serde(flatten)]
    pub early_booking: EarlyBookingPolicy,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SchoolPackage {
    #[serde(default, deserialize_with = "optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "non_negative_f64")]
    pub price: f64,
    /// Free text such as "5 Days / 4 Nights".
    #[serde(default, deserialize_with = "optional_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub duration_days: Option<f64>,
    #[serde(default, deserialize_with = "optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "bool_or_false")]
    pub flexible_dates: bool,
    #[serde(flatten)]
    pub early_booking: EarlyBookingPolicy,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    #[serde(default, rename = "_id", deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub ratings: Vec<Rating>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub packages: Vec<SchoolPackage>,
}

/// A stored listing document of one of the three kinds the marketplace sells.
#[derive(Debug, Clone)]
pub enum RawListing {
    Trip(TripRecord),
    Event(EventRecord),
    School(SchoolRecord),
}

impl RawListing {
    pub fn kind(&self) -> ItemKind {
        match self {
            RawListing::Trip(_) => ItemKind::Trip,
            RawListing::Event(_) => ItemKind::Event,
            RawListing::School(_) => ItemKind::School,
        }
    }

    /// `itemType` wins when it names a known kind. Otherwise schools are
    /// recognised by their `packages` list and events by a guide/organizer;
    /// everything else is read as a trip.
    pub fn infer_kind(value: &Value) -> ItemKind {
        if let Some(kind) = value
            .get("itemType")
            .and_then(Value::as_str)
            .and_then(ItemKind::parse)
        {
            return kind;
        }

        if value.get("packages").is_some() {
            ItemKind::School
        } else if value.get("guide").is_some() || value.get("organizer").is_some() {
            ItemKind::Event
        } else {
            ItemKind::Trip
        }
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let kind = Self::infer_kind(&value);
        Self::from_value_as(kind, value)
    }

    /// Used when the source already knows the kind, e.g. the collection a
    /// document was read from.
    pub fn from_value_as(kind: ItemKind, mut value: Value) -> Result<Self, serde_json::Error> {
        Self::fold_field_aliases(kind, &mut value);

        match kind {
            ItemKind::Trip => serde_json::from_value(value).map(RawListing::Trip),
            ItemKind::Event => serde_json::from_value(value).map(RawListing::Event),
            ItemKind::School => serde_json::from_value(value).map(RawListing::School),
        }
    }

    /// Rewrites alternative field names to the ones the records declare, so a
    /// document carrying both spellings (`_id` and `id`, say) still decodes.
    fn fold_field_aliases(kind: ItemKind, value: &mut Value) {
        match kind {
            ItemKind::Trip => {
                fold_aliases(value, TRIP_FIELDS);
                fold_aliases(value, EARLY_BOOKING_FIELDS);
            }
            ItemKind::Event => {
                fold_aliases(value, EVENT_FIELDS);
                fold_aliases(value, EARLY_BOOKING_FIELDS);
            }
            ItemKind::School => {
                fold_aliases(value, SCHOOL_FIELDS);
                fold_each(value, "packages", PACKAGE_FIELDS);
                fold_each(value, "packages", EARLY_BOOKING_FIELDS);
            }
        }
        fold_each(value, "ratings", RATING_FIELDS);
    }

    /// Parses every object in `values`, logging and skipping the rest.
    pub fn from_values(values: Vec<Value>) -> Vec<RawListing> {
        values
            .into_iter()
            .filter_map(|value| match RawListing::from_value(value) {
                Ok(listing) => Some(listing),
                Err(err) => {
                    log::warn!("Skipping malformed listing record: {}", err);
                    None
                }
            })
            .collect()
    }
}

impl<'de> Deserialize<'de> for RawListing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RawListing::from_value(value).map_err(serde::de::Error::custom)
    }
}
