//! Events route.

use axum::{
    extract::{Query, State},
    Json,
};

use waypoint_core::{EntityKind, Event, Freshness};
use waypoint_db::resolve;

use super::{owner_coordinates, DependentQuery};
use crate::{ApiError, AppState};

/// `GET /events?id=<location_id>[&latitude=..&longitude=..]` — local events
/// within the fixed search radius, cached per location id, capped at 20.
pub async fn get_events(
    State(state): State<AppState>,
    Query(params): Query<DependentQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let (location_id, latitude, longitude) = owner_coordinates(&state, &params).await?;

    let events = resolve(
        &state.db.events,
        &location_id,
        Freshness::for_kind(EntityKind::Event),
        || {
            let client = state.providers.events.clone();
            async move { client.fetch(latitude, longitude).await }
        },
    )
    .await?;

    Ok(Json(events))
}
