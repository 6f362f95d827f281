//! Serde helper functions for catalog payloads.
//!
//! The upstream catalog sends empty strings instead of `null` for some
//! optional fields (release dates of unreleased titles, missing artwork).
//! These helpers normalise both cases to `None`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize an optional NaiveDate, treating empty strings as None.
/// Expects format: YYYY-MM-DD
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Deserialize an optional string into a plain string, `null` becoming empty.
pub fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        string_field: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        date_field: Option<NaiveDate>,
        #[serde(default, deserialize_with = "deserialize_null_as_empty")]
        text_field: String,
    }

    #[test]
    fn test_deserialize_optional_string_empty() {
        let json = r#"{"string_field": ""}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_null() {
        let json = r#"{"string_field": null}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_value() {
        let json = r#"{"string_field": "/poster.jpg"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, Some("/poster.jpg".to_string()));
    }

    #[test]
    fn test_deserialize_optional_date_empty() {
        let json = r#"{"date_field": ""}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.date_field, None);
    }

    #[test]
    fn test_deserialize_optional_date_value() {
        let json = r#"{"date_field": "1999-10-15"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.date_field, NaiveDate::from_ymd_opt(1999, 10, 15));
    }

    #[test]
    fn test_deserialize_optional_date_invalid() {
        let json = r#"{"date_field": "15/10/1999"}"#;
        let result: Result<TestStruct, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_null_as_empty() {
        let json = r#"{"text_field": null}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.text_field, "");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let result: TestStruct = serde_json::from_str("{}").unwrap();
        assert_eq!(
            result,
            TestStruct {
                string_field: None,
                date_field: None,
                text_field: String::new(),
            }
        );
    }
}
