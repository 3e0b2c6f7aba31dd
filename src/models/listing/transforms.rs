use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::{
    display::DisplayItem,
    raw::{EventRecord, ItemKind, Rating, RawListing, SchoolRecord, TripRecord},
};
use crate::services::{discount_service::DiscountService, pricing_service::PricingService};

pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400?text=No+Image";

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("static pattern compiles"));

impl RawListing {
    pub fn normalize(&self) -> DisplayItem {
        self.normalize_at(Utc::now())
    }

    /// Normalize against an explicit clock; early-bird windows are evaluated at `now`.
    pub fn normalize_at(&self, now: DateTime<Utc>) -> DisplayItem {
        match self {
            RawListing::Trip(trip) => trip.normalize_at(now),
            RawListing::Event(event) => event.normalize_at(now),
            RawListing::School(school) => school.normalize_at(now),
        }
    }
}

impl TripRecord {
    pub fn normalize_at(&self, now: DateTime<Utc>) -> DisplayItem {
        let base_price = PricingService::compute_total(&self.pricing);
        let early_bird = DiscountService::apply_early_bird(base_price, &self.early_booking, now);
        let (rating, review_count) = summarize_ratings(&self.ratings);
        let duration_days = resolve_duration_days(
            self.duration_days,
            self.start_date,
            self.end_date,
            None,
        );
        let destination = self.destination.clone().unwrap_or_default();

        DisplayItem {
            id: self.id.clone().unwrap_or_default(),
            kind: ItemKind::Trip,
            title: title_or_untitled(self.title.as_deref(), ItemKind::Trip),
            location: self.location.clone().unwrap_or_else(|| destination.clone()),
            destination,
            guide: String::new(),
            image: pick_image(self.image.as_deref(), &self.images),
            start_date: self.start_date,
            end_date: self.end_date,
            base_price,
            discounted_price: early_bird.final_price,
            early_bird_applied: early_bird.applicable,
            category: self.category.clone().unwrap_or_default(),
            rating,
            review_count,
            tags: self.tags.clone(),
            duration: format_days(duration_days),
            duration_days,
            flexible: self.flexible_dates || self.start_date.is_none(),
        }
    }
}

impl EventRecord {
    pub fn normalize_at(&self, now: DateTime<Utc>) -> DisplayItem {
        let early_bird = DiscountService::apply_early_bird(self.price, &self.early_booking, now);
        let (rating, review_count) = summarize_ratings(&self.ratings);
        let duration_days = resolve_duration_days(
            self.duration_days,
            self.start_date,
            self.end_date,
            None,
        );

        DisplayItem {
            id: self.id.clone().unwrap_or_default(),
            kind: ItemKind::Event,
            title: title_or_untitled(self.title.as_deref(), ItemKind::Event),
            location: self.location.clone().unwrap_or_default(),
            destination: String::new(),
            guide: self.guide.clone().unwrap_or_default(),
            image: pick_image(self.image.as_deref(), &self.images),
            start_date: self.start_date,
            end_date: self.end_date,
            base_price: self.price,
            discounted_price: early_bird.final_price,
            early_bird_applied: early_bird.applicable,
            category: self.category.clone().unwrap_or_default(),
            rating,
            review_count,
            tags: self.tags.clone(),
            duration: format_days(duration_days),
            duration_days,
            flexible: self.flexible_dates || self.start_date.is_none(),
        }
    }
}

impl SchoolRecord {
    /// Schools are listed by their first package. Without packages the item is
    /// still produced, priced at 0 with empty duration and location.
    pub fn normalize_at(&self, now: DateTime<Utc>) -> DisplayItem {
        let (rating, review_count) = summarize_ratings(&self.ratings);

        let mut item = DisplayItem {
            id: self.id.clone().unwrap_or_default(),
            kind: ItemKind::School,
            title: title_or_untitled(self.name.as_deref(), ItemKind::School),
            location: String::new(),
            destination: String::new(),
            guide: String::new(),
            image: pick_image(self.image.as_deref(), &self.images),
            start_date: None,
            end_date: None,
            base_price: 0.0,
            discounted_price: 0.0,
            early_bird_applied: false,
            category: self.category.clone().unwrap_or_default(),
            rating,
            review_count,
            tags: self.tags.clone(),
            duration: String::new(),
            duration_days: 1,
            flexible: true,
        };

        if let Some(package) = self.packages.first() {
            let early_bird =
                DiscountService::apply_early_bird(package.price, &package.early_booking, now);
            let duration_days = resolve_duration_days(
                package.duration_days,
                package.start_date,
                package.end_date,
                package.duration.as_deref(),
            );

            item.location = package.location.clone().unwrap_or_default();
            item.start_date = package.start_date;
            item.end_date = package.end_date;
            item.base_price = package.price;
            item.discounted_price = early_bird.final_price;
            item.early_bird_applied = early_bird.applicable;
            item.duration = package
                .duration
                .clone()
                .unwrap_or_else(|| format_days(duration_days));
            item.duration_days = duration_days;
            item.flexible = package.flexible_dates || package.start_date.is_none();
        }

        item
    }
}

fn title_or_untitled(title: Option<&str>, kind: ItemKind) -> String {
    match title {
        Some(title) => title.to_string(),
        None => format!("Untitled {}", kind.label()),
    }
}

fn pick_image(image: Option<&str>, images: &[String]) -> String {
    image
        .or_else(|| images.first().map(String::as_str))
        .unwrap_or(PLACEHOLDER_IMAGE)
        .to_string()
}

/// Average rating and number of reviews; no reviews means `(0.0, 0)`.
fn summarize_ratings(ratings: &[Rating]) -> (f64, u32) {
    if ratings.is_empty() {
        return (0.0, 0);
    }

    let sum: f64 = ratings.iter().map(|r| r.rating).sum();
    (sum / ratings.len() as f64, ratings.len() as u32)
}

/// Explicit day count first, then the span between start and end (both days
/// counted), then the first number in free-text duration. Falls back to 1.
fn resolve_duration_days(
    explicit: Option<f64>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    text: Option<&str>,
) -> u32 {
    if let Some(days) = explicit.filter(|days| *days >= 1.0) {
        return days.round() as u32;
    }

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end >= start {
            return (end - start).num_days() as u32 + 1;
        }
    }

    text.and_then(|text| LEADING_NUMBER.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|days| *days >= 1)
        .unwrap_or(1)
}

fn format_days(days: u32) -> String {
    if days == 1 {
        "1 Day".to_string()
    } else {
        format!("{} Days", days)
    }
}
