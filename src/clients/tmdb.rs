use serde::Deserialize;

use super::{ClientError, ProviderRequest, endpoint};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<MovieItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieItem {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
}

/// `GET {base}/search/movie?query=..&api_key=..`
pub fn request(base: &str, api_key: &str, query: &str) -> Result<ProviderRequest, ClientError> {
    let mut url = endpoint(base, &["search", "movie"])?;
    url.query_pairs_mut()
        .append_pair("query", query)
        .append_pair("api_key", api_key);
    Ok(ProviderRequest::new(url))
}
