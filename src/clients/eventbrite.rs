use serde::Deserialize;

use super::{ClientError, ProviderRequest, endpoint};

pub const DEFAULT_BASE_URL: &str = "https://www.eventbriteapi.com/v3";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub events: Vec<EventItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventItem {
    pub url: Option<String>,
    pub name: Option<TextField>,
    pub start: Option<EventTime>,
    pub description: Option<TextField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextField {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventTime {
    /// Wall-clock start, e.g. `2026-10-19T19:00:00`.
    pub local: Option<String>,
}

/// `GET {base}/events/search/?location.latitude=..&location.longitude=..&token=..`
pub fn request(
    base: &str,
    token: &str,
    latitude: f64,
    longitude: f64,
) -> Result<ProviderRequest, ClientError> {
    let mut url = endpoint(base, &["events", "search", ""])?;
    url.query_pairs_mut()
        .append_pair("location.latitude", &latitude.to_string())
        .append_pair("location.longitude", &longitude.to_string())
        .append_pair("token", token);
    Ok(ProviderRequest::new(url))
}
