use serde::Deserialize;

use super::{ClientError, ProviderRequest, endpoint};

pub const DEFAULT_BASE_URL: &str = "https://api.darksky.net";

/// Forecast envelope; the daily points sit under `daily.data`.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub data: Vec<DailyPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyPoint {
    /// Unix seconds at the start of the day.
    pub time: Option<i64>,
    pub summary: Option<String>,
}

/// `GET {base}/forecast/{key}/{lat},{lng}`
pub fn request(
    base: &str,
    api_key: &str,
    latitude: f64,
    longitude: f64,
) -> Result<ProviderRequest, ClientError> {
    let coordinates = format!("{latitude},{longitude}");
    let url = endpoint(base, &["forecast", api_key, &coordinates])?;
    Ok(ProviderRequest::new(url))
}
