//! HTTP handlers for waypoint-api.
//!
//! Each handler derives a `(entity kind, lookup key, fetch)` triple from the
//! request and hands it to the resolution engine; the engine returns
//! normalized entities (or an error) and the handler shapes the HTTP
//! response. Handlers never talk to providers or the store directly beyond
//! the location prerequisite lookup.

pub mod businesses;
pub mod events;
pub mod location;
pub mod movies;
pub mod weather;

pub use businesses::get_businesses;
pub use events::get_events;
pub use location::get_location;
pub use movies::get_movies;
pub use weather::get_weather;

use serde::Deserialize;

use waypoint_core::LocationKey;

use crate::{ApiError, AppState};

/// Query parameters for the dependent-entity routes.
///
/// `id` is a previously resolved location's identifier. The coordinate pair
/// is optional: requests chained from a prior `/location` fetch carry it,
/// otherwise the owning row is looked up by id.
#[derive(Debug, Deserialize)]
pub struct DependentQuery {
    pub id: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Enforce the location prerequisite for a dependent lookup.
///
/// Returns `(location_id, latitude, longitude)`. When the request already
/// carries coordinates the store is not consulted; otherwise the location is
/// resolved by id and a missing row is a 404, since no dependent fetch may
/// proceed without its owner.
pub(crate) async fn owner_coordinates(
    state: &AppState,
    params: &DependentQuery,
) -> Result<(i32, f64, f64), ApiError> {
    if let (Some(latitude), Some(longitude)) = (params.latitude, params.longitude) {
        return Ok((params.id, latitude, longitude));
    }

    let location = state
        .db
        .locations
        .find(&LocationKey::ById(params.id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no location with id {}", params.id)))?;

    Ok((location.id, location.latitude, location.longitude))
}
