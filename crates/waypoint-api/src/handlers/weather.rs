//! Weather route.

use axum::{
    extract::{Query, State},
    Json,
};

use waypoint_core::{EntityKind, Forecast, Freshness};
use waypoint_db::resolve;

use super::{owner_coordinates, DependentQuery};
use crate::{ApiError, AppState};

/// `GET /weather?id=<location_id>[&latitude=..&longitude=..]` — daily
/// forecasts for a resolved location, cached per location id.
pub async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<DependentQuery>,
) -> Result<Json<Vec<Forecast>>, ApiError> {
    let (location_id, latitude, longitude) = owner_coordinates(&state, &params).await?;

    let forecasts = resolve(
        &state.db.weather,
        &location_id,
        Freshness::for_kind(EntityKind::Weather),
        || {
            let weather = state.providers.weather.clone();
            async move { weather.fetch(latitude, longitude).await }
        },
    )
    .await?;

    Ok(Json(forecasts))
}
