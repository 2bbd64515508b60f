use axum::{Router, handler::HandlerWithoutStateExt, middleware, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

mod error;
mod observability;
mod resources;
pub mod validation;

pub use crate::state::{AppState, create_app_state, create_app_state_from_config};
pub use error::ApiError;

use crate::domain::ResourceKind;

pub(crate) const LOCATION_ROUTE: &str = "/location";

pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = state.config.server.public_dir.clone();

    let mut routes = Router::new()
        .route(LOCATION_ROUTE, get(resources::get_location))
        .route(ResourceKind::Weather.route(), get(resources::get_weather))
        .route(ResourceKind::Events.route(), get(resources::get_events))
        .route(ResourceKind::Movies.route(), get(resources::get_movies))
        .route(ResourceKind::Businesses.route(), get(resources::get_businesses));

    if state.prometheus_handle.is_some() {
        routes = routes.route("/metrics", get(observability::get_metrics));
    }

    let static_files = ServeDir::new(public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(resources::not_found.into_service());

    // Only GET is routed; other methods get the same 404 as unknown paths.
    routes
        .method_not_allowed_fallback(resources::not_found)
        .with_state(state)
        .fallback_service(static_files)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::request_metrics))
}
