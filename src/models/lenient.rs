//! Field deserializers for loosely-typed listing documents.
//!
//! Stored trips, events and schools come from form submissions, so numbers
//! arrive as strings, dates in several layouts and ids either as plain strings
//! or as extended JSON. Every helper here substitutes a default instead of
//! failing, which keeps one malformed field from rejecting a whole record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Read a finite number from a JSON number or a numeric string.
pub fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Parse RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) and
/// bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Dates may be strings, epoch milliseconds, or relaxed extended JSON
/// (`{"$date": "..."}` / `{"$date": {"$numberLong": "..."}}`).
pub fn datetime_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_datetime(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(map) => match map.get("$date")? {
            Value::Object(inner) => inner
                .get("$numberLong")
                .and_then(Value::as_str)
                .and_then(|ms| ms.parse::<i64>().ok())
                .and_then(DateTime::from_timestamp_millis),
            other => datetime_from_value(other),
        },
        _ => None,
    }
}

fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0))
}

/// Costs, fees and percentages: anything negative or non-numeric becomes 0.
pub fn non_negative_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0).max(0.0))
}

pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

/// Blank strings count as missing.
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_from_value(&value))
}

pub fn optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(datetime_from_value(&value))
}

/// Accepts `"abc"`, `42` or `{"$oid": "abc"}`.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Object(map) => map.get("$oid").and_then(string_from_value),
        other => string_from_value(other),
    })
}

/// A JSON array of strings, or a single comma-separated string (the shape
/// list filters take in a query string).
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(string_from_value).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

/// Deserializes each array element on its own and drops the ones that do not
/// fit `T`. Anything other than an array yields an empty list.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Collapses alternative spellings of a field onto its canonical key.
///
/// The canonical key wins when it holds a value; otherwise the first populated
/// alternative moves into its place. Alternatives are removed either way, so a
/// document carrying both spellings still decodes.
pub fn fold_aliases(value: &mut Value, fields: &[(&str, &[&str])]) {
    let Some(object) = value.as_object_mut() else {
        return;
    };

    for (canonical, alternatives) in fields {
        let mut found = object.get(*canonical).is_some_and(is_populated);
        for alternative in alternatives.iter() {
            let Some(candidate) = object.remove(*alternative) else {
                continue;
            };
            if !found && is_populated(&candidate) {
                object.insert(canonical.to_string(), candidate);
                found = true;
            }
        }
    }
}

fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use serde_json::json;

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(12.5)), Some(12.5));
        assert_eq!(number_from_value(&json!(" 40 ")), Some(40.0));
        assert_eq!(number_from_value(&json!("abc")), None);
        assert_eq!(number_from_value(&json!("")), None);
        assert_eq!(number_from_value(&json!(null)), None);
        assert_eq!(number_from_value(&json!(true)), None);
    }

    #[test]
    fn test_parse_datetime_layouts() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2025-03-14"), Some(expected));
        assert_eq!(parse_datetime("2025-03-14T00:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("2025-03-14T00:00:00.000"), Some(expected));
        assert_eq!(
            parse_datetime("2025-03-14T05:30:00+05:30"),
            Some(expected)
        );
        assert_eq!(parse_datetime("next tuesday"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn test_datetime_from_extended_json() {
        let iso = json!({ "$date": "2024-12-01T10:00:00Z" });
        assert_eq!(datetime_from_value(&iso).map(|d| d.month()), Some(12));

        let canonical = json!({ "$date": { "$numberLong": "0" } });
        assert_eq!(
            datetime_from_value(&canonical),
            Some(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap())
        );

        assert_eq!(datetime_from_value(&json!({ "when": "2024-01-01" })), None);
    }

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "non_negative_f64")]
        cost: f64,
        #[serde(default, deserialize_with = "optional_id")]
        id: Option<String>,
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "bool_or_false")]
        flag: bool,
    }

    #[test]
    fn test_defaults_on_garbage() {
        let sample: Sample = serde_json::from_value(json!({
            "cost": -5,
            "id": { "$oid": "65f0c0ffee" },
            "tags": ["hiking", 7, null, "  "],
            "flag": "yes"
        }))
        .unwrap();

        assert_eq!(sample.cost, 0.0);
        assert_eq!(sample.id.as_deref(), Some("65f0c0ffee"));
        assert_eq!(sample.tags, vec!["hiking".to_string(), "7".to_string()]);
        assert!(sample.flag);

        let empty: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.cost, 0.0);
        assert!(empty.id.is_none());
        assert!(empty.tags.is_empty());
        assert!(!empty.flag);
    }

    #[test]
    fn test_string_list_from_comma_separated() {
        let sample: Sample = serde_json::from_value(json!({ "tags": "beach, surf,,camping" })).unwrap();
        assert_eq!(sample.tags, vec!["beach", "surf", "camping"]);
    }

    const FIELDS: &[(&str, &[&str])] = &[("_id", &["id"]), ("name", &["title", "schoolName"])];

    #[test]
    fn test_fold_aliases_keeps_canonical_key() {
        let mut value = json!({ "_id": "a1", "id": "a1-virtual", "name": "Surf", "title": "Other" });
        fold_aliases(&mut value, FIELDS);
        assert_eq!(value, json!({ "_id": "a1", "name": "Surf" }));
    }

    #[test]
    fn test_fold_aliases_promotes_first_populated_alternative() {
        let mut value = json!({ "id": "b2", "name": null, "title": " ", "schoolName": "Dive Co" });
        fold_aliases(&mut value, FIELDS);
        assert_eq!(value, json!({ "_id": "b2", "name": "Dive Co" }));

        let mut not_an_object = json!([1, 2]);
        fold_aliases(&mut not_an_object, FIELDS);
        assert_eq!(not_an_object, json!([1, 2]));
    }
}
