use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient::{bool_or_false, optional_f64, optional_string, string_list};
use super::listing::ItemKind;

/// Listing filters as sent by the browse page. Every field is optional and an
/// all-default filter admits every item.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default, deserialize_with = "optional_string")]
    pub search_term: Option<String>,
    #[serde(default, deserialize_with = "lenient_search_type")]
    pub search_type: Option<SearchType>,
    #[serde(default, deserialize_with = "string_list")]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub months: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub durations: Vec<String>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "bool_or_false")]
    pub exclude_flexible: bool,
}

/// The search tab a term applies to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Trip,
    Event,
    Adventure,
}

impl SearchType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "trip" | "trips" => Some(SearchType::Trip),
            "event" | "events" => Some(SearchType::Event),
            "adventure" | "adventures" | "school" | "schools" => Some(SearchType::Adventure),
            _ => None,
        }
    }

    /// The listing kind this tab searches over
    pub fn item_kind(&self) -> ItemKind {
        match self {
            SearchType::Trip => ItemKind::Trip,
            SearchType::Event => ItemKind::Event,
            SearchType::Adventure => ItemKind::School,
        }
    }
}

fn lenient_search_type<'de, D>(deserializer: D) -> Result<Option<SearchType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(SearchType::parse))
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    DepartureSoon,
    DepartureLate,
    PriceLow,
    PriceHigh,
    DurationShort,
    DurationLong,
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "departure-soon" => Ok(SortOption::DepartureSoon),
            "departure-late" => Ok(SortOption::DepartureLate),
            "price-low" => Ok(SortOption::PriceLow),
            "price-high" => Ok(SortOption::PriceHigh),
            "duration-short" => Ok(SortOption::DurationShort),
            "duration-long" => Ok(SortOption::DurationLong),
            other => Err(format!("Unknown sort option: {}", other)),
        }
    }
}

/// A `durations` filter token: `"1-3"`, `"8+"`, optionally followed by a unit
/// such as `"4-7 days"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBucket {
    pub min_days: u32,
    pub max_days: Option<u32>,
}

impl DurationBucket {
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.split_whitespace().next()?;

        if let Some(min) = token.strip_suffix('+') {
            return Some(Self {
                min_days: min.parse().ok()?,
                max_days: None,
            });
        }

        match token.split_once('-') {
            Some((min, max)) => {
                let min_days: u32 = min.parse().ok()?;
                let max_days: u32 = max.parse().ok()?;
                (min_days <= max_days).then_some(Self {
                    min_days,
                    max_days: Some(max_days),
                })
            }
            None => {
                let days: u32 = token.parse().ok()?;
                Some(Self {
                    min_days: days,
                    max_days: Some(days),
                })
            }
        }
    }

    pub fn contains(&self, days: u32) -> bool {
        days >= self.min_days && self.max_days.is_none_or(|max| days <= max)
    }
}

/// Month filter tokens are names (`"March"`, `"mar"`) or numbers `1`-`12`.
pub fn parse_month(raw: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];

    let token = raw.trim().to_lowercase();
    if let Ok(number) = token.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }

    if token.len() < 3 {
        return None;
    }

    MONTHS
        .iter()
        .position(|month| month.starts_with(&token))
        .map(|index| index as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_state_from_json() {
        let filters: FilterState = serde_json::from_value(json!({
            "searchTerm": "  ",
            "searchType": "adventure",
            "types": ["Trekking", "Camping"],
            "minPrice": "",
            "maxPrice": "5000",
            "excludeFlexible": true
        }))
        .unwrap();

        assert_eq!(filters.search_term, None);
        assert_eq!(filters.search_type, Some(SearchType::Adventure));
        assert_eq!(filters.types.len(), 2);
        assert_eq!(filters.min_price, None);
        assert_eq!(filters.max_price, Some(5000.0));
        assert!(filters.exclude_flexible);
    }

    #[test]
    fn test_unknown_search_type_is_ignored() {
        let filters: FilterState =
            serde_json::from_value(json!({ "searchType": "cruise" })).unwrap();
        assert_eq!(filters.search_type, None);
    }

    #[test]
    fn test_sort_option_names() {
        assert_eq!("price-low".parse::<SortOption>(), Ok(SortOption::PriceLow));
        assert_eq!("Duration-Long".parse::<SortOption>(), Ok(SortOption::DurationLong));
        assert!("cheapest".parse::<SortOption>().is_err());

        let sort: SortOption = serde_json::from_value(json!("departure-late")).unwrap();
        assert_eq!(sort, SortOption::DepartureLate);
        assert_eq!(SortOption::default(), SortOption::DepartureSoon);
    }

    #[test]
    fn test_duration_buckets() {
        let short = DurationBucket::parse("1-3").unwrap();
        assert!(short.contains(1) && short.contains(3));
        assert!(!short.contains(4));

        let long = DurationBucket::parse("8+ days").unwrap();
        assert!(long.contains(8) && long.contains(40));
        assert!(!long.contains(7));

        assert_eq!(DurationBucket::parse("5"), Some(DurationBucket { min_days: 5, max_days: Some(5) }));
        assert_eq!(DurationBucket::parse("7-3"), None);
        assert_eq!(DurationBucket::parse("long"), None);
        assert_eq!(DurationBucket::parse(""), None);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("March"), Some(3));
        assert_eq!(parse_month("sep"), Some(9));
        assert_eq!(parse_month("12"), Some(12));
        assert_eq!(parse_month("13"), None);
        assert_eq!(parse_month("ju"), None);
        assert_eq!(parse_month("summer"), None);
    }
}
