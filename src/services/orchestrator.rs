//! Provider fetch followed by a fan-out insert of every returned item.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::ServiceError;
use crate::clients::{ClientError, ProviderRequest, Upstream, darksky, eventbrite, tmdb, yelp};
use crate::db::PersistenceGateway;
use crate::domain::{LocationId, ResourceKind};
use crate::models::{
    NewBusiness, NewEvent, NewMovie, NewRecord, NewWeather, Record, now_millis,
};

/// Pulls the kind's result array out of a provider body and transforms every
/// item.
///
/// The array lives at a fixed place per provider: `daily.data` for weather,
/// `events`, `results` for movies and `businesses`.
pub fn extract_records(
    kind: ResourceKind,
    body: serde_json::Value,
    created_at: i64,
) -> Result<Vec<NewRecord>, serde_json::Error> {
    let records = match kind {
        ResourceKind::Weather => serde_json::from_value::<darksky::ForecastResponse>(body)?
            .daily
            .data
            .into_iter()
            .map(|point| NewRecord::Weather(NewWeather::from_provider(point, created_at)))
            .collect(),
        ResourceKind::Events => serde_json::from_value::<eventbrite::SearchResponse>(body)?
            .events
            .into_iter()
            .map(|item| NewRecord::Event(NewEvent::from_provider(item, created_at)))
            .collect(),
        ResourceKind::Movies => serde_json::from_value::<tmdb::SearchResponse>(body)?
            .results
            .into_iter()
            .map(|item| NewRecord::Movie(NewMovie::from_provider(item, created_at)))
            .collect(),
        ResourceKind::Businesses => serde_json::from_value::<yelp::SearchResponse>(body)?
            .businesses
            .into_iter()
            .map(|item| NewRecord::Business(NewBusiness::from_provider(item, created_at)))
            .collect(),
    };

    Ok(records)
}

#[derive(Clone)]
pub struct FetchOrchestrator {
    gateway: Arc<dyn PersistenceGateway>,
    upstream: Arc<dyn Upstream>,
}

impl FetchOrchestrator {
    #[must_use]
    pub fn new(gateway: Arc<dyn PersistenceGateway>, upstream: Arc<dyn Upstream>) -> Self {
        Self { gateway, upstream }
    }

    /// Calls the provider once, stores every transformed item and returns the
    /// rows that were stored.
    ///
    /// A provider failure aborts the whole call. Item inserts run concurrently;
    /// one that fails is logged and left out of the result.
    pub async fn fetch_and_store(
        &self,
        kind: ResourceKind,
        request: &ProviderRequest,
        location_id: LocationId,
    ) -> Result<Vec<Record>, ServiceError> {
        info!(resource = %kind, %location_id, "Requesting new data from provider");
        metrics::counter!("provider_requests_total", "resource" => kind.as_str()).increment(1);

        let body = self
            .upstream
            .get_json(request)
            .await
            .map_err(|source| ServiceError::provider(kind.as_str(), source))?;

        let batch = extract_records(kind, body, now_millis())
            .map_err(|e| ServiceError::provider(kind.as_str(), ClientError::Decode(e)))?;

        debug!(resource = %kind, items = batch.len(), "Storing provider batch");

        let inserts = batch
            .into_iter()
            .map(|record| self.gateway.insert_record(location_id, record));

        let mut stored = Vec::new();
        for result in join_all(inserts).await {
            match result {
                Ok(record) => stored.push(record),
                Err(e) => {
                    metrics::counter!("record_insert_failures_total", "resource" => kind.as_str())
                        .increment(1);
                    error!(resource = %kind, %location_id, "Failed to store record: {e:#}");
                }
            }
        }

        Ok(stored)
    }
}
