use serde::Deserialize;

use super::{ClientError, ProviderRequest, endpoint};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode";

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// `GET {base}/json?address=..&key=..`
pub fn request(base: &str, api_key: &str, address: &str) -> Result<ProviderRequest, ClientError> {
    let mut url = endpoint(base, &["json"])?;
    url.query_pairs_mut()
        .append_pair("address", address)
        .append_pair("key", api_key);
    Ok(ProviderRequest::new(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_puts_key_in_query() {
        let request = request(DEFAULT_BASE_URL, "k3y", "Seattle, WA").unwrap();
        assert_eq!(request.url.path(), "/maps/api/geocode/json");
        assert_eq!(request.url.query(), Some("address=Seattle%2C+WA&key=k3y"));
        assert!(request.bearer.is_none());
    }

    #[test]
    fn response_without_results_decodes_empty() {
        let parsed: GeocodeResponse =
            serde_json::from_value(serde_json::json!({ "status": "ZERO_RESULTS" })).unwrap();
        assert!(parsed.results.is_empty());
    }
}
