use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use city_explorer::clients::{ClientError, ProviderRequest, Upstream};
use city_explorer::config::Config;
use city_explorer::db::{PersistenceGateway, Store};
use city_explorer::domain::{LocationId, ResourceKind};
use city_explorer::entities::prelude::Locations;
use city_explorer::models::{Location, NewLocation, NewRecord, NewWeather, now_millis};
use http_body_util::BodyExt;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Canned provider: answers by path fragment and remembers every request.
#[derive(Default)]
struct RecordingUpstream {
    routes: Vec<(&'static str, Value)>,
    seen: Mutex<Vec<ProviderRequest>>,
    latency: Option<Duration>,
}

impl RecordingUpstream {
    fn with(mut self, path_fragment: &'static str, body: Value) -> Self {
        self.routes.push((path_fragment, body));
        self
    }

    fn slow(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn last(&self) -> ProviderRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Upstream for RecordingUpstream {
    async fn get_json(&self, request: &ProviderRequest) -> Result<Value, ClientError> {
        self.seen.lock().unwrap().push(request.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.routes
            .iter()
            .find(|(fragment, _)| request.url.path().contains(fragment))
            .map(|(_, body)| body.clone())
            .ok_or(ClientError::Status(503))
    }
}

fn providers() -> RecordingUpstream {
    RecordingUpstream::default()
        .with(
            "/geocode/json",
            json!({
                "results": [{
                    "formatted_address": "Seattle, WA, USA",
                    "geometry": { "location": { "lat": 47.6, "lng": -122.3 } }
                }],
                "status": "OK"
            }),
        )
        .with(
            "/forecast/",
            json!({
                "daily": {
                    "data": [
                        { "time": 1_540_018_800, "summary": "Rain until afternoon." },
                        { "time": 1_540_105_200, "summary": "Mostly cloudy." },
                        { "time": 1_540_191_600, "summary": "Clear throughout the day." }
                    ]
                }
            }),
        )
        .with(
            "/events/search/",
            json!({
                "events": [{
                    "url": "https://www.eventbrite.com/e/1",
                    "name": { "text": "Harbor Lights" },
                    "start": { "local": "2019-01-10T19:00:00" },
                    "description": { "text": "An evening on the water." }
                }]
            }),
        )
        .with(
            "/search/movie",
            json!({
                "results": [
                    { "title": "Sleepless in Seattle", "poster_path": "/a.jpg", "vote_count": 10 },
                    { "title": "Singles", "poster_path": null }
                ]
            }),
        )
        .with(
            "/businesses/search",
            json!({
                "businesses": [
                    { "name": "Pike Place Chowder", "price": "$$", "rating": 4.5 }
                ]
            }),
        )
}

struct TestApp {
    router: Router,
    store: Store,
    upstream: Arc<RecordingUpstream>,
}

async fn spawn_app_with(upstream: RecordingUpstream, public_dir: Option<String>) -> TestApp {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.providers.businesses.api_key = "yelp-secret".to_string();
    config.providers.weather.api_key = "sky-key".to_string();
    if let Some(dir) = public_dir {
        config.server.public_dir = dir;
    }

    let store = Store::new(&config.database.url)
        .await
        .expect("failed to open in-memory store");
    let upstream = Arc::new(upstream);

    let state =
        city_explorer::api::create_app_state(config, store.clone(), upstream.clone(), None);

    TestApp {
        router: city_explorer::api::router(state),
        store,
        upstream,
    }
}

async fn spawn_app() -> TestApp {
    spawn_app_with(providers(), None).await
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: &TestApp, uri: &str) -> Value {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}");
    serde_json::from_slice(&body).unwrap()
}

async fn seed_location(store: &Store) -> Location {
    store
        .insert_location(NewLocation {
            created_at: now_millis(),
            latitude: 47.6,
            longitude: -122.3,
            search_query: "Seattle".to_string(),
            formatted_query: "Seattle, WA, USA".to_string(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn unknown_path_is_plain_text_404() {
    let app = spawn_app().await;

    let (status, body) = get(&app, "/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Sorry, page not found");
}

#[tokio::test]
async fn location_is_created_once_per_query() {
    let app = spawn_app().await;

    let first = get_json(&app, "/location?data=Seattle").await;
    assert_eq!(first["search_query"], "Seattle");
    assert_eq!(first["formatted_query"], "Seattle, WA, USA");
    assert_eq!(first["latitude"], 47.6);
    assert_eq!(first["longitude"], -122.3);
    assert!(first["id"].as_i64().unwrap() > 0);

    let second = get_json(&app, "/location?data=Seattle").await;
    assert_eq!(first["id"], second["id"]);
    assert_eq!(app.upstream.calls(), 1);

    let stored = app
        .store
        .get_location(LocationId::new(i32::try_from(first["id"].as_i64().unwrap()).unwrap()))
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn concurrent_first_lookups_share_one_location() {
    let app = spawn_app_with(providers().slow(Duration::from_millis(50)), None).await;

    let (first, second) = tokio::join!(
        get_json(&app, "/location?data=Seattle"),
        get_json(&app, "/location?data=Seattle"),
    );

    assert_eq!(first["id"], second["id"]);
    assert_eq!(app.upstream.calls(), 2);

    let id = LocationId::new(i32::try_from(first["id"].as_i64().unwrap()).unwrap());
    assert!(app.store.get_location(id).await.unwrap().is_some());
    let rows = Locations::find().count(&app.store.conn).await.unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn non_get_methods_are_plain_text_404() {
    let app = spawn_app().await;

    for uri in ["/location", "/weather", "/nonexistent"] {
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "POST {uri}");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Sorry, page not found");
    }
}

#[tokio::test]
async fn weather_is_fetched_then_served_from_cache() {
    let app = spawn_app().await;
    let location = seed_location(&app.store).await;
    let uri = format!(
        "/weather?data%5Bid%5D={}&data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3",
        location.id
    );

    let first = get_json(&app, &uri).await;
    let days = first.as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["forecast"], "Rain until afternoon.");
    assert_eq!(days[0]["time"], "Sat Oct 20 2018");
    assert_eq!(days[0]["location_id"], location.id.value());
    assert_eq!(
        app.upstream.last().url.path(),
        "/forecast/sky-key/47.6,-122.3"
    );

    let second = get_json(&app, &uri).await;
    assert_eq!(first, second);
    assert_eq!(app.upstream.calls(), 1);
}

#[tokio::test]
async fn stale_weather_batch_is_replaced() {
    let app = spawn_app().await;
    let location = seed_location(&app.store).await;
    let two_days_ago = now_millis() - 2 * 24 * 60 * 60 * 1000;

    for _ in 0..7 {
        app.store
            .insert_record(
                location.id,
                NewRecord::Weather(NewWeather {
                    created_at: two_days_ago,
                    forecast: Some("Stale".to_string()),
                    time: "Sat Oct 17 2026".to_string(),
                }),
            )
            .await
            .unwrap();
    }

    let body = get_json(
        &app,
        &format!(
            "/weather?data={}",
            urlencode(&json!({ "id": location.id, "latitude": 47.6, "longitude": -122.3 }))
        ),
    )
    .await;

    let days = body.as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert!(days.iter().all(|d| d["forecast"] != "Stale"));
    assert!(days.iter().all(|d| d["created_at"].as_i64().unwrap() > two_days_ago));
    assert_eq!(app.upstream.calls(), 1);

    let stored = app
        .store
        .find_records(ResourceKind::Weather, location.id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn events_movies_and_businesses_are_cached_permanently() {
    let app = spawn_app().await;
    let location = seed_location(&app.store).await;
    let id = location.id;

    let events_uri =
        format!("/events?data%5Bid%5D={id}&data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3");
    let movies_uri = format!("/movies?data%5Bid%5D={id}&data%5Bsearch_query%5D=Seattle");
    let yelp_uri = format!("/yelp?data%5Bid%5D={id}&data%5Bsearch_query%5D=Seattle");

    for _ in 0..3 {
        let events = get_json(&app, &events_uri).await;
        assert_eq!(events[0]["name"], "Harbor Lights");
        assert_eq!(events[0]["event_date"], "Thu Jan 10 2019");

        let movies = get_json(&app, &movies_uri).await;
        assert_eq!(movies.as_array().unwrap().len(), 2);
        assert_eq!(movies[0]["image_url"], "https://image.tmdb.org/t/p/w500/a.jpg");
        assert_eq!(movies[1]["image_url"], "https://image.tmdb.org/t/p/w500/null");

        let businesses = get_json(&app, &yelp_uri).await;
        assert_eq!(businesses[0]["name"], "Pike Place Chowder");
        assert_eq!(businesses[0]["price"], "$$");
    }

    assert_eq!(app.upstream.calls(), 3);
}

#[tokio::test]
async fn yelp_is_called_with_bearer_credential() {
    let app = spawn_app().await;
    let location = seed_location(&app.store).await;

    get_json(
        &app,
        &format!(
            "/yelp?data%5Bid%5D={}&data%5Bsearch_query%5D=Seattle",
            location.id
        ),
    )
    .await;

    let request = app.upstream.last();
    assert_eq!(request.bearer.as_deref(), Some("yelp-secret"));
    assert_eq!(request.url.query(), Some("location=Seattle"));
}

#[tokio::test]
async fn provider_failure_is_a_generic_500() {
    let app = spawn_app_with(RecordingUpstream::default(), None).await;
    let location = seed_location(&app.store).await;

    let (status, body) = get(
        &app,
        &format!("/movies?data%5Bid%5D={}&data%5Bsearch_query%5D=Seattle", location.id),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Sorry, something went wrong.");

    let stored = app
        .store
        .find_records(ResourceKind::Movies, location.id)
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn records_for_an_unknown_location_are_dropped() {
    let app = spawn_app().await;

    let body = get_json(&app, "/yelp?data%5Bid%5D=999&data%5Bsearch_query%5D=Nowhere").await;

    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn malformed_input_is_rejected_before_calling_providers() {
    let app = spawn_app().await;

    let (status, _) = get(&app, "/weather?data%5Bid%5D=1&data%5Blatitude%5D=north").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/location").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.upstream.calls(), 0);
}

#[tokio::test]
async fn static_files_are_served_from_public_dir() {
    let dir = std::env::temp_dir().join(format!("city-explorer-public-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>City Explorer</h1>").unwrap();

    let app = spawn_app_with(providers(), Some(dir.display().to_string())).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );

    let (status, body) = get(&app, "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Sorry, page not found");

    std::fs::remove_dir_all(&dir).ok();
}

fn urlencode(value: &Value) -> String {
    url::form_urlencoded::byte_serialize(value.to_string().as_bytes()).collect()
}
