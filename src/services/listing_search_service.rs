use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Utc};

use crate::models::{
    listing::{DisplayItem, ItemKind},
    search::{parse_month, DurationBucket, FilterState, SearchType, SortOption},
};

pub struct ListingSearchService;

impl ListingSearchService {
    pub fn process(
        items: Vec<DisplayItem>,
        filters: &FilterState,
        sort: SortOption,
    ) -> Vec<DisplayItem> {
        Self::process_at(items, filters, sort, Utc::now())
    }

    /// Filter then stable-sort `items`. Undated items sort as if departing at `now`.
    pub fn process_at(
        items: Vec<DisplayItem>,
        filters: &FilterState,
        sort: SortOption,
        now: DateTime<Utc>,
    ) -> Vec<DisplayItem> {
        let months: Vec<u32> = filters.months.iter().filter_map(|m| parse_month(m)).collect();
        let buckets: Vec<DurationBucket> = filters
            .durations
            .iter()
            .filter_map(|d| DurationBucket::parse(d))
            .collect();

        let mut matched: Vec<DisplayItem> = items
            .into_iter()
            .filter(|item| Self::matches_search(item, filters))
            .filter(|item| Self::matches_types(item, &filters.types))
            .filter(|item| Self::matches_price(item, filters.min_price, filters.max_price))
            .filter(|item| Self::matches_months(item, &months))
            .filter(|item| Self::matches_durations(item, &buckets))
            .filter(|item| !(filters.exclude_flexible && item.flexible))
            .collect();

        matched.sort_by(|a, b| Self::compare(a, b, sort, now));
        matched
    }

    /// An active search keeps only items of the selected tab's kind whose
    /// searchable fields contain the term.
    pub fn matches_search(item: &DisplayItem, filters: &FilterState) -> bool {
        let Some(term) = filters.search_term.as_deref().map(str::trim) else {
            return true;
        };
        if term.is_empty() {
            return true;
        }

        let search_type = filters.search_type.unwrap_or_default();
        if item.kind != search_type.item_kind() {
            return false;
        }

        let term = term.to_lowercase();
        let contains = |field: &str| field.to_lowercase().contains(&term);

        match search_type {
            SearchType::Trip => contains(item.title.as_str()) || contains(item.destination.as_str()),
            SearchType::Event => contains(item.title.as_str()) || contains(item.guide.as_str()),
            SearchType::Adventure => {
                contains(item.title.as_str()) || item.tags.iter().any(|tag| contains(tag.as_str()))
            }
        }
    }

    /// Schools match on any tag; other kinds on their category.
    pub fn matches_types(item: &DisplayItem, types: &[String]) -> bool {
        if types.is_empty() {
            return true;
        }

        let matches = |value: &str| types.iter().any(|t| t.trim().eq_ignore_ascii_case(value.trim()));

        match item.kind {
            ItemKind::School => item.tags.iter().any(|tag| matches(tag.as_str())),
            ItemKind::Trip | ItemKind::Event => matches(item.category.as_str()),
        }
    }

    pub fn matches_price(item: &DisplayItem, min_price: Option<f64>, max_price: Option<f64>) -> bool {
        let price = item.discounted_price;
        min_price.is_none_or(|min| price >= min) && max_price.is_none_or(|max| price <= max)
    }

    pub fn matches_months(item: &DisplayItem, months: &[u32]) -> bool {
        if months.is_empty() {
            return true;
        }

        item.start_date
            .is_some_and(|start| months.contains(&start.month()))
    }

    pub fn matches_durations(item: &DisplayItem, buckets: &[DurationBucket]) -> bool {
        buckets.is_empty() || buckets.iter().any(|bucket| bucket.contains(item.duration_days))
    }

    pub fn compare(a: &DisplayItem, b: &DisplayItem, sort: SortOption, now: DateTime<Utc>) -> Ordering {
        let departure = |item: &DisplayItem| item.start_date.unwrap_or(now);

        match sort {
            SortOption::DepartureSoon => departure(a).cmp(&departure(b)),
            SortOption::DepartureLate => departure(b).cmp(&departure(a)),
            SortOption::PriceLow => a.discounted_price.total_cmp(&b.discounted_price),
            SortOption::PriceHigh => b.discounted_price.total_cmp(&a.discounted_price),
            SortOption::DurationShort => a.duration_days.max(1).cmp(&b.duration_days.max(1)),
            SortOption::DurationLong => b.duration_days.max(1).cmp(&a.duration_days.max(1)),
        }
    }
}
