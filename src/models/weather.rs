use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::{INVALID_DATE, display_date};
use crate::clients::darksky::DailyPoint;
use crate::domain::LocationId;

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: i32,
    pub created_at: i64,
    pub forecast: Option<String>,
    pub time: String,
    pub location_id: LocationId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWeather {
    pub created_at: i64,
    pub forecast: Option<String>,
    pub time: String,
}

impl NewWeather {
    #[must_use]
    pub fn from_provider(point: DailyPoint, created_at: i64) -> Self {
        let time = point
            .time
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map_or_else(|| INVALID_DATE.to_string(), |dt| display_date(dt.date_naive()));

        Self {
            created_at,
            forecast: point.summary,
            time,
        }
    }
}
