use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::{AppState, LOCATION_ROUTE};
use crate::domain::ResourceKind;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// Metric and span label for the resource a request path asks for.
///
/// Anything that is not an API route is a static file lookup, so arbitrary
/// paths collapse into one series.
fn resource_label(path: &str) -> &'static str {
    match path {
        LOCATION_ROUTE => "location",
        "/metrics" => "metrics",
        _ => ResourceKind::from_route(path).map_or("static", ResourceKind::as_str),
    }
}

/// Wraps every request in a `request` span and records
/// `http_requests_total` / `http_request_duration_seconds` per resource.
pub async fn request_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let resource = resource_label(req.uri().path());
    let method = req.method().to_string();

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        resource,
        method = %method,
        path = %req.uri().path(),
    );

    async move {
        let response = next.run(req).await;
        let elapsed = start.elapsed();
        let status = response.status();

        let labels = [
            ("method", method),
            ("resource", resource.to_string()),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if status.is_server_error() {
            warn!(status = status.as_u16(), duration_ms, "Request failed");
        } else {
            info!(status = status.as_u16(), duration_ms, "Request finished");
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_routes_are_labelled_by_resource() {
        assert_eq!(resource_label("/location"), "location");
        assert_eq!(resource_label("/weather"), "weather");
        assert_eq!(resource_label("/yelp"), "businesses");
    }

    #[test]
    fn other_paths_share_the_static_label() {
        assert_eq!(resource_label("/"), "static");
        assert_eq!(resource_label("/css/app.css"), "static");
        assert_eq!(resource_label("/weather/extra"), "static");
    }
}
