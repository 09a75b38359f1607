//! Maps the weather provider's forecast document to a [`ForecastResult`]
//!
//! The document has the shape
//! `{ forecast: { forecastday: [ { day: { condition: { code, text } } }, .. ] } }`.
//! Parsing goes one level at a time so a failure names the level that broke.
//! Only the second `forecastday` entry (index 1) is read: the request asks for
//! two days and the delivery is tomorrow.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use shared::ForecastResult;
use thiserror::Error;

/// Index of the forecast day the delivery falls on
pub const DELIVERY_DAY_INDEX: usize = 1;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForecastMapError {
    #[error("forecast is not a nested JSON object")]
    Forecast,

    #[error("forecastday is not a nested JSON object")]
    ForecastDay,

    #[error("day is not a nested JSON object")]
    Day,

    #[error("condition is not a nested JSON object")]
    Condition,

    #[error("forecast response could not be mapped successfully")]
    Unmapped,
}

#[derive(Debug, Deserialize)]
struct ForecastDocument {
    forecast: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ForecastSection {
    forecastday: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    day: DaySummary,
}

#[derive(Debug, Deserialize)]
struct DaySummary {
    #[serde(default)]
    condition: Option<Condition>,
}

#[derive(Debug, Default, Deserialize)]
struct Condition {
    #[serde(default)]
    code: f64,
    #[serde(default)]
    text: String,
}

/// Extract the delivery-day condition from a forecast document
pub fn map_to_forecast(document: &Value) -> Result<ForecastResult, ForecastMapError> {
    let document: ForecastDocument = parse_object(document, ForecastMapError::Forecast)?;

    let section: ForecastSection = serde_json::from_value(Value::Object(document.forecast))
        .map_err(|_| ForecastMapError::ForecastDay)?;

    let entry = section
        .forecastday
        .get(DELIVERY_DAY_INDEX)
        .filter(|entry| entry.is_object())
        .ok_or(ForecastMapError::Day)?;
    let day: ForecastDay = parse_object(entry, ForecastMapError::Condition)?;

    let condition = day.day.condition.unwrap_or_default();
    if condition.code == 0.0 || condition.text.is_empty() {
        return Err(ForecastMapError::Unmapped);
    }

    Ok(ForecastResult::new(condition.code, condition.text))
}

/// Deserialize `value` as `T`, refusing anything that is not a JSON object
fn parse_object<T: DeserializeOwned>(
    value: &Value,
    error: ForecastMapError,
) -> Result<T, ForecastMapError> {
    if !value.is_object() {
        return Err(error);
    }
    T::deserialize(value).map_err(|_| error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(days: Value) -> Value {
        json!({ "forecast": { "forecastday": days } })
    }

    fn day(code: Value, text: &str) -> Value {
        json!({ "day": { "condition": { "code": code, "text": text } } })
    }

    #[test]
    fn test_reads_second_day() {
        let doc = document(json!([day(json!(300.0), "Partly cloudy"), day(json!(200.0), "Sunny")]));

        let result = map_to_forecast(&doc).unwrap();

        assert_eq!(result, ForecastResult::new(200.0, "Sunny"));
    }

    #[test]
    fn test_missing_forecast() {
        let doc = json!({ "foo": "bar" });
        assert_eq!(map_to_forecast(&doc), Err(ForecastMapError::Forecast));
        assert_eq!(
            map_to_forecast(&doc).unwrap_err().to_string(),
            "forecast is not a nested JSON object"
        );
    }

    #[test]
    fn test_forecast_not_an_object() {
        let doc = json!({ "forecast": "test" });
        assert_eq!(map_to_forecast(&doc), Err(ForecastMapError::Forecast));
    }

    #[test]
    fn test_missing_forecastday() {
        let doc = json!({ "forecast": { "foo": "bar" } });
        assert_eq!(map_to_forecast(&doc), Err(ForecastMapError::ForecastDay));
    }

    #[test]
    fn test_forecastday_not_a_sequence() {
        let doc = document(json!("not-an-array"));
        assert_eq!(
            map_to_forecast(&doc).unwrap_err().to_string(),
            "forecastday is not a nested JSON object"
        );
    }

    #[test]
    fn test_second_day_not_an_object() {
        let doc = document(json!([day(json!(200.0), "Sunny"), "not-a-map"]));
        assert_eq!(
            map_to_forecast(&doc).unwrap_err().to_string(),
            "day is not a nested JSON object"
        );
    }

    #[test]
    fn test_second_day_as_array_is_not_parsed_positionally() {
        let doc = document(json!([day(json!(200.0), "Sunny"), [{ "condition": {} }]]));
        assert_eq!(map_to_forecast(&doc), Err(ForecastMapError::Day));
    }

    #[test]
    fn test_single_day_only() {
        let doc = document(json!([day(json!(200.0), "Sunny")]));
        assert_eq!(map_to_forecast(&doc), Err(ForecastMapError::Day));
    }

    #[test]
    fn test_day_summary_missing() {
        let doc = document(json!([day(json!(200.0), "Sunny"), { "astro": {} }]));
        assert_eq!(
            map_to_forecast(&doc).unwrap_err().to_string(),
            "condition is not a nested JSON object"
        );
    }

    #[test]
    fn test_condition_with_wrong_types() {
        let doc = document(json!([day(json!(200.0), "Sunny"), day(json!("1000"), "Sunny")]));
        assert_eq!(map_to_forecast(&doc), Err(ForecastMapError::Condition));
    }

    #[test]
    fn test_empty_condition_is_unmapped() {
        let doc = document(json!([day(json!(200.0), "Sunny"), { "day": { "condition": {} } }]));
        assert_eq!(map_to_forecast(&doc), Err(ForecastMapError::Unmapped));
    }

    #[test]
    fn test_missing_condition_is_unmapped() {
        let doc = document(json!([day(json!(200.0), "Sunny"), { "day": {} }]));
        assert_eq!(map_to_forecast(&doc), Err(ForecastMapError::Unmapped));
    }

    #[test]
    fn test_zero_code_or_blank_text_is_unmapped() {
        let zero = document(json!([day(json!(200.0), "Sunny"), day(json!(0.0), "Sunny")]));
        assert_eq!(map_to_forecast(&zero), Err(ForecastMapError::Unmapped));

        let blank = document(json!([day(json!(200.0), "Sunny"), day(json!(1063.0), "")]));
        assert_eq!(map_to_forecast(&blank), Err(ForecastMapError::Unmapped));
    }

    #[test]
    fn test_integer_codes_are_accepted() {
        let doc = document(json!([day(json!(1000), "Sunny"), day(json!(1183), "Light rain")]));
        assert_eq!(map_to_forecast(&doc).unwrap(), ForecastResult::new(1183.0, "Light rain"));
    }
}
