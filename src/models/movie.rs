use serde::{Deserialize, Serialize};

use crate::clients::tmdb::{MovieItem, POSTER_BASE_URL};
use crate::domain::LocationId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: i32,
    pub created_at: i64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub average_votes: Option<f64>,
    pub total_votes: Option<i64>,
    pub image_url: String,
    pub popularity: Option<f64>,
    pub released_on: Option<String>,
    pub location_id: LocationId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub created_at: i64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub average_votes: Option<f64>,
    pub total_votes: Option<i64>,
    pub image_url: String,
    pub popularity: Option<f64>,
    pub released_on: Option<String>,
}

impl NewMovie {
    /// The poster URL is always produced; a missing poster path yields
    /// `.../w500/null`, which clients render as a broken image.
    #[must_use]
    pub fn from_provider(item: MovieItem, created_at: i64) -> Self {
        let poster = item.poster_path.as_deref().unwrap_or("null");
        let poster = poster.trim_start_matches('/');

        Self {
            created_at,
            title: item.title,
            overview: item.overview,
            average_votes: item.vote_average,
            total_votes: item.vote_count,
            image_url: format!("{POSTER_BASE_URL}/{poster}"),
            popularity: item.popularity,
            released_on: item.release_date,
        }
    }
}
