//! Location route: the identity anchor every dependent route builds on.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use waypoint_core::{Location, LocationKey};
use waypoint_db::resolve_location;

use crate::{ApiError, AppState};

/// Query parameters for `GET /location`.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// Free-text place query, e.g. `?data=Seattle`.
    pub data: String,
}

/// `GET /location?data=<place>` — resolve a place query to its canonical
/// location record, geocoding on first sight and serving the stored row on
/// every request after.
pub async fn get_location(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<Location>, ApiError> {
    let query = params.data.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("missing place query".to_string()));
    }

    let key = LocationKey::ByText(query.clone());
    let location = resolve_location(&state.db.locations, &key, || {
        let geocode = state.providers.geocode.clone();
        async move { geocode.geocode(&query).await }
    })
    .await?;

    Ok(Json(location))
}
