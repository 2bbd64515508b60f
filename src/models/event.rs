use serde::{Deserialize, Serialize};

use super::{INVALID_DATE, display_local_date};
use crate::clients::eventbrite::EventItem;
use crate::domain::LocationId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i32,
    pub created_at: i64,
    pub link: Option<String>,
    pub name: Option<String>,
    pub event_date: String,
    pub summary: Option<String>,
    pub location_id: LocationId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub created_at: i64,
    pub link: Option<String>,
    pub name: Option<String>,
    pub event_date: String,
    pub summary: Option<String>,
}

impl NewEvent {
    #[must_use]
    pub fn from_provider(item: EventItem, created_at: i64) -> Self {
        let event_date = item
            .start
            .and_then(|start| start.local)
            .map_or_else(|| INVALID_DATE.to_string(), |raw| display_local_date(&raw));

        Self {
            created_at,
            link: item.url,
            name: item.name.and_then(|n| n.text),
            event_date,
            summary: item.description.and_then(|d| d.text),
        }
    }
}
