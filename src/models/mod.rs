//! Stored record shapes and the pure transformers that build them from
//! provider items.

pub mod business;
pub mod event;
pub mod location;
pub mod movie;
pub mod weather;

pub use business::{BusinessRecord, NewBusiness};
pub use event::{EventRecord, NewEvent};
pub use location::{Location, NewLocation};
pub use movie::{MovieRecord, NewMovie};
pub use weather::{NewWeather, WeatherRecord};

use crate::domain::{LocationId, ResourceKind};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Rendered in place of a calendar date that could not be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Current wall-clock time in epoch milliseconds, the unit of `created_at`.
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Formats a day as `Www Mmm dd yyyy`, e.g. `Mon Oct 19 2026`.
#[must_use]
pub fn display_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Accepts either a full local timestamp or a bare date.
fn display_local_date(raw: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return display_date(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_or_else(|_| INVALID_DATE.to_string(), display_date)
}

/// A persisted row of one of the cached resource kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Weather(WeatherRecord),
    Event(EventRecord),
    Movie(MovieRecord),
    Business(BusinessRecord),
}

impl Record {
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Weather(_) => ResourceKind::Weather,
            Self::Event(_) => ResourceKind::Events,
            Self::Movie(_) => ResourceKind::Movies,
            Self::Business(_) => ResourceKind::Businesses,
        }
    }

    #[must_use]
    pub const fn id(&self) -> i32 {
        match self {
            Self::Weather(r) => r.id,
            Self::Event(r) => r.id,
            Self::Movie(r) => r.id,
            Self::Business(r) => r.id,
        }
    }

    /// Cache timestamp in epoch milliseconds.
    #[must_use]
    pub const fn created_at(&self) -> i64 {
        match self {
            Self::Weather(r) => r.created_at,
            Self::Event(r) => r.created_at,
            Self::Movie(r) => r.created_at,
            Self::Business(r) => r.created_at,
        }
    }

    #[must_use]
    pub const fn location_id(&self) -> LocationId {
        match self {
            Self::Weather(r) => r.location_id,
            Self::Event(r) => r.location_id,
            Self::Movie(r) => r.location_id,
            Self::Business(r) => r.location_id,
        }
    }
}

/// A transformed provider item that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Weather(NewWeather),
    Event(NewEvent),
    Movie(NewMovie),
    Business(NewBusiness),
}
