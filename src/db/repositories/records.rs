//! Per-kind record tables.
//!
//! Each [`ResourceKind`] is bound to exactly one entity here; the table is
//! never chosen from a string.

use crate::domain::{LocationId, ResourceKind};
use crate::entities::{events, movies, prelude::*, weathers, yelps};
use crate::models::{
    BusinessRecord, EventRecord, MovieRecord, NewRecord, Record, WeatherRecord,
};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

pub struct RecordRepository {
    conn: DatabaseConnection,
}

impl RecordRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_weather(m: weathers::Model) -> Record {
        Record::Weather(WeatherRecord {
            id: m.id,
            created_at: m.created_at,
            forecast: m.forecast,
            time: m.time,
            location_id: LocationId::new(m.location_id),
        })
    }

    fn map_event(m: events::Model) -> Record {
        Record::Event(EventRecord {
            id: m.id,
            created_at: m.created_at,
            link: m.link,
            name: m.name,
            event_date: m.event_date,
            summary: m.summary,
            location_id: LocationId::new(m.location_id),
        })
    }

    fn map_movie(m: movies::Model) -> Record {
        Record::Movie(MovieRecord {
            id: m.id,
            created_at: m.created_at,
            title: m.title,
            overview: m.overview,
            average_votes: m.average_votes,
            total_votes: m.total_votes,
            image_url: m.image_url,
            popularity: m.popularity,
            released_on: m.released_on,
            location_id: LocationId::new(m.location_id),
        })
    }

    fn map_business(m: yelps::Model) -> Record {
        Record::Business(BusinessRecord {
            id: m.id,
            created_at: m.created_at,
            name: m.name,
            image_url: m.image_url,
            price: m.price,
            rating: m.rating,
            url: m.url,
            location_id: LocationId::new(m.location_id),
        })
    }

    // ========================================================================
    // Batch Operations
    // ========================================================================

    /// Rows for one location in insertion order.
    pub async fn find(&self, kind: ResourceKind, location_id: LocationId) -> Result<Vec<Record>> {
        let id = location_id.value();

        let records = match kind {
            ResourceKind::Weather => Weathers::find()
                .filter(weathers::Column::LocationId.eq(id))
                .order_by_asc(weathers::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Self::map_weather)
                .collect(),
            ResourceKind::Events => Events::find()
                .filter(events::Column::LocationId.eq(id))
                .order_by_asc(events::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Self::map_event)
                .collect(),
            ResourceKind::Movies => Movies::find()
                .filter(movies::Column::LocationId.eq(id))
                .order_by_asc(movies::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Self::map_movie)
                .collect(),
            ResourceKind::Businesses => Yelps::find()
                .filter(yelps::Column::LocationId.eq(id))
                .order_by_asc(yelps::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Self::map_business)
                .collect(),
        };

        Ok(records)
    }

    pub async fn delete(&self, kind: ResourceKind, location_id: LocationId) -> Result<u64> {
        let id = location_id.value();

        let result = match kind {
            ResourceKind::Weather => {
                Weathers::delete_many()
                    .filter(weathers::Column::LocationId.eq(id))
                    .exec(&self.conn)
                    .await?
            }
            ResourceKind::Events => {
                Events::delete_many()
                    .filter(events::Column::LocationId.eq(id))
                    .exec(&self.conn)
                    .await?
            }
            ResourceKind::Movies => {
                Movies::delete_many()
                    .filter(movies::Column::LocationId.eq(id))
                    .exec(&self.conn)
                    .await?
            }
            ResourceKind::Businesses => {
                Yelps::delete_many()
                    .filter(yelps::Column::LocationId.eq(id))
                    .exec(&self.conn)
                    .await?
            }
        };

        debug!(
            table = kind.table(),
            %location_id,
            rows = result.rows_affected,
            "Deleted cached rows"
        );
        Ok(result.rows_affected)
    }

    pub async fn insert(&self, location_id: LocationId, record: NewRecord) -> Result<Record> {
        let location_id = Set(location_id.value());

        let stored = match record {
            NewRecord::Weather(day) => {
                let model = weathers::ActiveModel {
                    created_at: Set(day.created_at),
                    forecast: Set(day.forecast),
                    time: Set(day.time),
                    location_id,
                    ..Default::default()
                }
                .insert(&self.conn)
                .await?;
                Self::map_weather(model)
            }
            NewRecord::Event(event) => {
                let model = events::ActiveModel {
                    created_at: Set(event.created_at),
                    link: Set(event.link),
                    name: Set(event.name),
                    event_date: Set(event.event_date),
                    summary: Set(event.summary),
                    location_id,
                    ..Default::default()
                }
                .insert(&self.conn)
                .await?;
                Self::map_event(model)
            }
            NewRecord::Movie(movie) => {
                let model = movies::ActiveModel {
                    created_at: Set(movie.created_at),
                    title: Set(movie.title),
                    overview: Set(movie.overview),
                    average_votes: Set(movie.average_votes),
                    total_votes: Set(movie.total_votes),
                    image_url: Set(movie.image_url),
                    popularity: Set(movie.popularity),
                    released_on: Set(movie.released_on),
                    location_id,
                    ..Default::default()
                }
                .insert(&self.conn)
                .await?;
                Self::map_movie(model)
            }
            NewRecord::Business(business) => {
                let model = yelps::ActiveModel {
                    created_at: Set(business.created_at),
                    name: Set(business.name),
                    image_url: Set(business.image_url),
                    price: Set(business.price),
                    rating: Set(business.rating),
                    url: Set(business.url),
                    location_id,
                    ..Default::default()
                }
                .insert(&self.conn)
                .await?;
                Self::map_business(model)
            }
        };

        Ok(stored)
    }
}
