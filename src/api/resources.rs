use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::{self, QueryParams};
use super::{ApiError, AppState};
use crate::clients::{darksky, eventbrite, geocode, tmdb, yelp};
use crate::domain::ResourceKind;
use crate::models::{Location, Record};

pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Location>, ApiError> {
    let search_query = validation::location_text(&params)?;
    let provider = &state.config.providers.geocode;
    let request = geocode::request(&provider.base_url, &provider.api_key, &search_query)?;

    let location = state.resources.location(&search_query, &request).await?;
    Ok(Json(location))
}

pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let input = validation::coordinates(&params)?;
    let provider = &state.config.providers.weather;
    let request = darksky::request(
        &provider.base_url,
        &provider.api_key,
        input.latitude,
        input.longitude,
    )?;

    let records = state
        .resources
        .get_or_fetch(ResourceKind::Weather, input.id, &request)
        .await?;
    Ok(Json(records))
}

pub async fn get_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let input = validation::coordinates(&params)?;
    let provider = &state.config.providers.events;
    let request = eventbrite::request(
        &provider.base_url,
        &provider.api_key,
        input.latitude,
        input.longitude,
    )?;

    let records = state
        .resources
        .get_or_fetch(ResourceKind::Events, input.id, &request)
        .await?;
    Ok(Json(records))
}

pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let input = validation::search(&params)?;
    let provider = &state.config.providers.movies;
    let request = tmdb::request(&provider.base_url, &provider.api_key, &input.search_query)?;

    let records = state
        .resources
        .get_or_fetch(ResourceKind::Movies, input.id, &request)
        .await?;
    Ok(Json(records))
}

pub async fn get_businesses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let input = validation::search(&params)?;
    let provider = &state.config.providers.businesses;
    let request = yelp::request(&provider.base_url, &provider.api_key, &input.search_query)?;

    let records = state
        .resources
        .get_or_fetch(ResourceKind::Businesses, input.id, &request)
        .await?;
    Ok(Json(records))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
