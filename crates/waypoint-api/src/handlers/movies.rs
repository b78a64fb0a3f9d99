//! Movies route.
//!
//! Movies are the one dataset keyed by region rather than location: every
//! location resolving to the same region code shares the cache entry.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use waypoint_core::{EntityKind, Freshness, LocationKey, Movie};
use waypoint_db::resolve;

use crate::{ApiError, AppState};

/// Query parameters for `GET /movies`.
///
/// Either a region code directly, or a location id whose stored row supplies
/// one. The region requires a resolved location either way.
#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    pub id: Option<i32>,
    pub region_code: Option<String>,
}

/// `GET /movies?region_code=US` or `GET /movies?id=<location_id>` —
/// movies playing in the region, cached per region code.
pub async fn get_movies(
    State(state): State<AppState>,
    Query(params): Query<MoviesQuery>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let region = match (params.region_code, params.id) {
        (Some(region), _) if !region.is_empty() => region,
        (_, Some(id)) => state
            .db
            .locations
            .find(&LocationKey::ById(id))
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("no location with id {id}")))?
            .region_code,
        _ => {
            return Err(ApiError::BadRequest(
                "movies require a region_code or a location id".to_string(),
            ))
        }
    };

    let movies = resolve(
        &state.db.movies,
        &region,
        Freshness::for_kind(EntityKind::Movie),
        || {
            let client = state.providers.movies.clone();
            let region = region.clone();
            async move { client.fetch(&region).await }
        },
    )
    .await?;

    Ok(Json(movies))
}
