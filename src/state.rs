use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::clients::{HttpUpstream, Upstream};
use crate::config::Config;
use crate::db::Store;
use crate::services::{CachePolicy, ResourceService};

/// Everything a request handler needs. Built once at startup.
pub struct AppState {
    pub config: Arc<Config>,

    pub resources: Arc<ResourceService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

/// Wires the state around an already-open store and a chosen upstream.
#[must_use]
pub fn create_app_state(
    config: Config,
    store: Store,
    upstream: Arc<dyn Upstream>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let resources = Arc::new(ResourceService::new(
        Arc::new(store),
        upstream,
        CachePolicy::new(config.cache.clone()),
    ));

    Arc::new(AppState {
        config: Arc::new(config),
        resources,
        prometheus_handle,
    })
}

/// Opens the configured database and talks to the real providers.
pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
        config.database.run_migrations,
    )
    .await?;

    let upstream = HttpUpstream::new(config.providers.request_timeout_seconds)
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))?;

    Ok(create_app_state(
        config,
        store,
        Arc::new(upstream),
        prometheus_handle,
    ))
}
