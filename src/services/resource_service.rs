//! Cache-or-fetch entry points used by the HTTP handlers.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{CacheDecision, CachePolicy, FetchOrchestrator};
use crate::clients::geocode::GeocodeResponse;
use crate::clients::{ClientError, ProviderRequest, Upstream};
use crate::db::PersistenceGateway;
use crate::domain::{LocationId, ResourceKind};
use crate::models::{Location, NewLocation, Record, now_millis};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{resource} provider request failed: {source}")]
    Provider {
        resource: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("store operation failed: {0:#}")]
    Store(anyhow::Error),

    #[error("no geocoding result for '{0}'")]
    NoGeocodeResult(String),
}

impl ServiceError {
    #[must_use]
    pub const fn provider(resource: &'static str, source: ClientError) -> Self {
        Self::Provider { resource, source }
    }
}

pub struct ResourceService {
    gateway: Arc<dyn PersistenceGateway>,
    upstream: Arc<dyn Upstream>,
    orchestrator: FetchOrchestrator,
    policy: CachePolicy,
}

impl ResourceService {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        upstream: Arc<dyn Upstream>,
        policy: CachePolicy,
    ) -> Self {
        let orchestrator = FetchOrchestrator::new(gateway.clone(), upstream.clone());
        Self {
            gateway,
            upstream,
            orchestrator,
            policy,
        }
    }

    /// Returns the stored location for `search_query`, geocoding and storing
    /// it on first sight. Locations never expire.
    pub async fn location(
        &self,
        search_query: &str,
        request: &ProviderRequest,
    ) -> Result<Location, ServiceError> {
        if let Some(existing) = self
            .gateway
            .find_location_by_query(search_query)
            .await
            .map_err(ServiceError::Store)?
        {
            debug!(location_id = %existing.id, "Serving stored location");
            return Ok(existing);
        }

        info!("Geocoding new location '{}'", search_query);
        metrics::counter!("provider_requests_total", "resource" => "location").increment(1);

        let body = self
            .upstream
            .get_json(request)
            .await
            .map_err(|source| ServiceError::provider("location", source))?;
        let response: GeocodeResponse = serde_json::from_value(body)
            .map_err(|e| ServiceError::provider("location", ClientError::Decode(e)))?;

        let location = NewLocation::from_provider(search_query, response, now_millis())
            .ok_or_else(|| ServiceError::NoGeocodeResult(search_query.to_string()))?;

        match self.gateway.insert_location(location).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                // A concurrent request may have stored the same query first.
                warn!("Failed to store location '{}': {e:#}", search_query);
                self.gateway
                    .find_location_by_query(search_query)
                    .await
                    .map_err(ServiceError::Store)?
                    .ok_or(ServiceError::Store(e))
            }
        }
    }

    /// Serves the stored batch of `kind` when it is fresh, otherwise replaces
    /// it with a new provider batch.
    pub async fn get_or_fetch(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        request: &ProviderRequest,
    ) -> Result<Vec<Record>, ServiceError> {
        let cached = self
            .gateway
            .find_records(kind, location_id)
            .await
            .map_err(ServiceError::Store)?;

        let now = now_millis();

        match self.policy.decide(kind, &cached, now) {
            CacheDecision::Serve => {
                debug!(resource = %kind, %location_id, rows = cached.len(), "Serving cached batch");
                metrics::counter!("cache_hits_total", "resource" => kind.as_str()).increment(1);
                Ok(cached)
            }
            CacheDecision::Fetch => {
                self.orchestrator
                    .fetch_and_store(kind, request, location_id)
                    .await
            }
            CacheDecision::Refresh => {
                let age_ms = cached.first().map_or(0, |r| now.saturating_sub(r.created_at()));
                let removed = self
                    .gateway
                    .delete_records(kind, location_id)
                    .await
                    .map_err(ServiceError::Store)?;

                info!(
                    resource = %kind,
                    %location_id,
                    age_ms,
                    removed,
                    "Cached batch expired"
                );
                metrics::counter!("cache_refreshes_total", "resource" => kind.as_str())
                    .increment(1);

                self.orchestrator
                    .fetch_and_store(kind, request, location_id)
                    .await
            }
        }
    }
}
