//! Extraction of the `data` query parameter.
//!
//! Browsers send the nested object in bracket form
//! (`data[id]=5&data[latitude]=47.6`); a JSON object string
//! (`data={"id":5,...}`) is accepted as well.

use std::collections::HashMap;

use super::ApiError;
use crate::domain::LocationId;

pub type QueryParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatesInput {
    pub id: LocationId,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchInput {
    pub id: LocationId,
    pub search_query: String,
}

fn data_field(params: &QueryParams, field: &str) -> Option<String> {
    if let Some(value) = params.get(&format!("data[{field}]")) {
        return Some(value.clone());
    }

    let raw = params.get("data")?;
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw).ok()?;
    match object.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required(params: &QueryParams, field: &str) -> Result<String, ApiError> {
    data_field(params, field)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("Missing query parameter: data[{field}]")))
}

fn location_id(params: &QueryParams) -> Result<LocationId, ApiError> {
    let raw = required(params, "id")?;
    let id: i32 = raw.parse().map_err(|_| {
        ApiError::validation(format!(
            "Invalid location ID: {}. ID must be a positive integer",
            raw
        ))
    })?;

    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid location ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(LocationId::new(id))
}

fn coordinate(params: &QueryParams, field: &str, limit: f64) -> Result<f64, ApiError> {
    let raw = required(params, field)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= limit => Ok(value),
        _ => Err(ApiError::validation(format!(
            "Invalid {}: {}. Must be a number between -{} and {}",
            field, raw, limit, limit
        ))),
    }
}

/// The raw location text for `/location`.
pub fn location_text(params: &QueryParams) -> Result<String, ApiError> {
    let text = params.get("data").map(|s| s.trim()).unwrap_or_default();
    if text.is_empty() {
        return Err(ApiError::validation("Location text cannot be empty"));
    }
    Ok(text.to_string())
}

/// `{id, latitude, longitude}` for weather and events.
pub fn coordinates(params: &QueryParams) -> Result<CoordinatesInput, ApiError> {
    Ok(CoordinatesInput {
        id: location_id(params)?,
        latitude: coordinate(params, "latitude", 90.0)?,
        longitude: coordinate(params, "longitude", 180.0)?,
    })
}

/// `{id, search_query}` for movies and businesses.
pub fn search(params: &QueryParams) -> Result<SearchInput, ApiError> {
    Ok(SearchInput {
        id: location_id(params)?,
        search_query: required(params, "search_query")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn bracket_form_is_read() {
        let input = coordinates(&params(&[
            ("data[id]", "5"),
            ("data[latitude]", "47.6"),
            ("data[longitude]", "-122.3"),
        ]))
        .unwrap();

        assert_eq!(
            input,
            CoordinatesInput {
                id: LocationId::new(5),
                latitude: 47.6,
                longitude: -122.3,
            }
        );
    }

    #[test]
    fn json_object_form_is_read() {
        let input = search(&params(&[(
            "data",
            r#"{"id": 7, "search_query": "seattle", "latitude": "47.6"}"#,
        )]))
        .unwrap();

        assert_eq!(input.id, LocationId::new(7));
        assert_eq!(input.search_query, "seattle");
    }

    #[test]
    fn missing_or_bad_fields_are_rejected() {
        assert!(coordinates(&params(&[("data[latitude]", "1"), ("data[longitude]", "1")])).is_err());
        assert!(
            coordinates(&params(&[
                ("data[id]", "abc"),
                ("data[latitude]", "1"),
                ("data[longitude]", "1"),
            ]))
            .is_err()
        );
        assert!(
            coordinates(&params(&[
                ("data[id]", "1"),
                ("data[latitude]", "91"),
                ("data[longitude]", "1"),
            ]))
            .is_err()
        );
        assert!(search(&params(&[("data[id]", "1"), ("data[search_query]", "  ")])).is_err());
        assert!(search(&params(&[("data[id]", "0"), ("data[search_query]", "x")])).is_err());
    }

    #[test]
    fn location_text_is_trimmed() {
        assert_eq!(
            location_text(&params(&[("data", "  Seattle ")])).unwrap(),
            "Seattle"
        );
        assert!(location_text(&params(&[])).is_err());
    }
}
