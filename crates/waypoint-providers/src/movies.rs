//! Movie-discovery provider client (TMDb discover API).

use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use waypoint_core::{now_ms, Error, Movie, Result};

/// Default movie API base URL.
pub const DEFAULT_MOVIES_URL: &str = "https://api.themoviedb.org";

/// Poster image base; the provider returns only a path fragment.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Client for the movie-discovery provider.
#[derive(Clone)]
pub struct MoviesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    #[serde(default)]
    results: Vec<RawMovie>,
}

#[derive(Debug, Deserialize)]
struct RawMovie {
    title: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: i32,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    popularity: f64,
    #[serde(default)]
    release_date: String,
}

impl MoviesClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(DEFAULT_MOVIES_URL.to_string(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetch movies playing in a region, in the provider's popularity
    /// ordering. The full response set is returned unmodified in count.
    pub async fn fetch(&self, region_code: &str) -> Result<Vec<Movie>> {
        let start = Instant::now();
        let url = format!(
            "{}/3/discover/movie?api_key={}&region={}&sort_by=popularity.desc",
            self.base_url, self.api_key, region_code
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "movie provider returned {}",
                response.status()
            )));
        }
        let body: DiscoverResponse = response.json().await?;
        let movies = normalize(body, now_ms());

        info!(
            subsystem = "providers",
            component = "movies",
            op = "fetch",
            region_code,
            result_count = movies.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Movie fetch complete"
        );
        Ok(movies)
    }
}

/// Map raw discover results into the canonical shape, preserving provider
/// order and count.
fn normalize(body: DiscoverResponse, created_at: i64) -> Vec<Movie> {
    body.results
        .into_iter()
        .map(|raw| Movie {
            title: raw.title,
            overview: raw.overview,
            average_votes: raw.vote_average,
            total_votes: raw.vote_count,
            image_url: raw
                .poster_path
                .map(|p| format!("{POSTER_BASE_URL}{p}"))
                .unwrap_or_default(),
            popularity: raw.popularity,
            released_on: raw.release_date,
            created_at,
        })
        .collect()
}
