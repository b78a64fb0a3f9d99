//! Core data models for waypoint.
//!
//! These types are shared across all waypoint crates and represent the
//! canonical entity shapes, whether a value was freshly fetched from a
//! provider or reconstituted from the record store.

use serde::{Deserialize, Serialize};

// =============================================================================
// ENTITY KINDS
// =============================================================================

/// The five domain record types the resolution engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Location,
    Weather,
    Event,
    Movie,
    Business,
}

impl EntityKind {
    /// Record store table backing this kind.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Location => "locations",
            EntityKind::Weather => "weather",
            EntityKind::Event => "events",
            EntityKind::Movie => "movies",
            EntityKind::Business => "yelps",
        }
    }
}

// =============================================================================
// LOCATION
// =============================================================================

/// Canonical location record: the identity anchor for all dependent entities.
///
/// Created on first successful geocode; never updated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub id: i32,
    /// Original free-text search query that produced this location.
    pub search_query: String,
    /// Provider-formatted canonical address.
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
    /// ISO country code from the geocode result's country component.
    /// Defaults to [`DEFAULT_REGION`] when the component is absent.
    pub region_code: String,
}

/// Fallback region code when the geocode response carries no country component.
pub const DEFAULT_REGION: &str = "US";

/// A location value before it has been persisted (no id yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLocation {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region_code: String,
}

/// Lookup key for location resolution.
///
/// A location is addressable by three disjoint identity attributes depending
/// on the calling context: the original search text (place-name requests),
/// an exact coordinate pair (requests chained from a prior location fetch),
/// or the internal row id (dependent-entity re-fetches). All three variants
/// read the same underlying record set; none is more canonical than another.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationKey {
    ByText(String),
    ByCoordinates { latitude: f64, longitude: f64 },
    ById(i32),
}

// =============================================================================
// DEPENDENT ENTITIES
// =============================================================================

/// One daily forecast entry, owned by a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Forecast {
    /// Provider's forecast summary text.
    pub forecast: String,
    /// Human-readable forecast date, e.g. `"Sat Aug 29 2026"`.
    pub time: String,
    /// Creation timestamp (epoch ms), used only by the freshness check.
    pub created_at: i64,
}

/// One local event, owned by a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub link: String,
    pub name: String,
    pub event_date: String,
    pub summary: String,
    pub created_at: i64,
}

/// One business listing, owned by a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Business {
    pub name: String,
    pub image_url: String,
    pub price: String,
    pub rating: f64,
    pub url: String,
    pub created_at: i64,
}

/// One movie playing in a region. Owned by a region code, not a location:
/// regional movie listings are genuinely region-wide, so two locations in the
/// same region share a cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub total_votes: i32,
    pub image_url: String,
    pub popularity: f64,
    pub released_on: String,
    pub created_at: i64,
}

/// Access to the creation timestamp the freshness check inspects.
///
/// Implemented by every cached entity kind except [`Location`], which is
/// immutable and never expires.
pub trait CacheEntity {
    fn created_at_ms(&self) -> i64;
}

impl CacheEntity for Forecast {
    fn created_at_ms(&self) -> i64 {
        self.created_at
    }
}

impl CacheEntity for Event {
    fn created_at_ms(&self) -> i64 {
        self.created_at
    }
}

impl CacheEntity for Business {
    fn created_at_ms(&self) -> i64 {
        self.created_at
    }
}

impl CacheEntity for Movie {
    fn created_at_ms(&self) -> i64 {
        self.created_at
    }
}
