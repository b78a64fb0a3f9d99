//! Business listings route.

use axum::{
    extract::{Query, State},
    Json,
};

use waypoint_core::{Business, EntityKind, Freshness};
use waypoint_db::resolve;

use super::{owner_coordinates, DependentQuery};
use crate::{ApiError, AppState};

/// `GET /yelps?id=<location_id>[&latitude=..&longitude=..]` — nearby
/// business listings, cached per location id, capped at 20.
pub async fn get_businesses(
    State(state): State<AppState>,
    Query(params): Query<DependentQuery>,
) -> Result<Json<Vec<Business>>, ApiError> {
    let (location_id, latitude, longitude) = owner_coordinates(&state, &params).await?;

    let listings = resolve(
        &state.db.businesses,
        &location_id,
        Freshness::for_kind(EntityKind::Business),
        || {
            let client = state.providers.businesses.clone();
            async move { client.fetch(latitude, longitude).await }
        },
    )
    .await?;

    Ok(Json(listings))
}
