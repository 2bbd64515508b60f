use serde::{Deserialize, Serialize};

use crate::clients::geocode::GeocodeResponse;
use crate::domain::LocationId;

/// Root entity: one row per distinct search text, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub created_at: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub search_query: String,
    pub formatted_query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub created_at: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub search_query: String,
    pub formatted_query: String,
}

impl NewLocation {
    /// Builds a location from the first geocoding match.
    ///
    /// Returns `None` when the provider found nothing for `search_query`.
    #[must_use]
    pub fn from_provider(
        search_query: &str,
        response: GeocodeResponse,
        created_at: i64,
    ) -> Option<Self> {
        let first = response.results.into_iter().next()?;

        Some(Self {
            created_at,
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
            search_query: search_query.to_string(),
            formatted_query: first.formatted_address,
        })
    }
}
