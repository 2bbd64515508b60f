//! Domain primitives shared by the store, the cache core and the HTTP layer.
//!
//! Uses the newtype pattern so a location id cannot be confused with a record
//! id of another table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored [`Location`](crate::models::Location).
///
/// # Examples
///
/// ```rust
/// use city_explorer::domain::LocationId;
///
/// let id = LocationId::new(5);
/// assert_eq!(id.value(), 5);
/// assert_eq!(id.to_string(), "5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LocationId(i32);

impl LocationId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<LocationId> for i32 {
    fn from(id: LocationId) -> Self {
        id.0
    }
}

impl From<i32> for LocationId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for LocationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for LocationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// The cached resource kinds that hang off a location.
///
/// Locations themselves are not a variant: they are the root entity and never
/// go through the cache-or-fetch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Weather,
    Events,
    Movies,
    Businesses,
}

impl ResourceKind {
    pub const ALL: [Self; 4] = [Self::Weather, Self::Events, Self::Movies, Self::Businesses];

    /// Name of the backing table.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Weather => "weathers",
            Self::Events => "events",
            Self::Movies => "movies",
            Self::Businesses => "yelps",
        }
    }

    /// HTTP route that serves this kind.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Weather => "/weather",
            Self::Events => "/events",
            Self::Movies => "/movies",
            Self::Businesses => "/yelp",
        }
    }

    #[must_use]
    pub fn from_route(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.route() == path)
    }

    /// Label used for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Events => "events",
            Self::Movies => "movies",
            Self::Businesses => "businesses",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_id_roundtrips_through_json() {
        let id: LocationId = serde_json::from_str("42").unwrap();
        assert_eq!(id, LocationId::new(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn businesses_live_in_yelps_table() {
        assert_eq!(ResourceKind::Businesses.table(), "yelps");
        assert_eq!(ResourceKind::Businesses.to_string(), "businesses");
        assert_eq!(ResourceKind::from_route("/yelp"), Some(ResourceKind::Businesses));
        assert_eq!(ResourceKind::from_route("/location"), None);
    }
}
