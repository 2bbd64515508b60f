use crate::domain::LocationId;
use crate::entities::{locations, prelude::*};
use crate::models::{Location, NewLocation};
use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

/// Repository for the root location rows.
pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: locations::Model) -> Location {
        Location {
            id: LocationId::new(m.id),
            created_at: m.created_at,
            latitude: m.latitude,
            longitude: m.longitude,
            search_query: m.search_query,
            formatted_query: m.formatted_query,
        }
    }

    pub async fn find_by_query(&self, search_query: &str) -> Result<Option<Location>> {
        let row = Locations::find()
            .filter(locations::Column::SearchQuery.eq(search_query))
            .one(&self.conn)
            .await?;

        Ok(row.map(Self::map_model))
    }

    pub async fn get(&self, id: LocationId) -> Result<Option<Location>> {
        let row = Locations::find_by_id(id.value()).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn insert(&self, location: NewLocation) -> Result<Location> {
        let active_model = locations::ActiveModel {
            created_at: Set(location.created_at),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            search_query: Set(location.search_query),
            formatted_query: Set(location.formatted_query),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        info!(
            "Stored location {} for query '{}'",
            model.id, model.search_query
        );
        Ok(Self::map_model(model))
    }
}
