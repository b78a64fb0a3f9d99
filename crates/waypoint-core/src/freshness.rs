//! Freshness policy for cached entity rows.
//!
//! **This module is the single source of truth** for the per-kind freshness
//! windows. The engine applies one window uniformly per entity kind; location
//! rows are immutable and never expire.

use crate::models::EntityKind;

// =============================================================================
// FRESHNESS WINDOWS (milliseconds)
// =============================================================================

/// Maximum age of cached weather rows before re-fetch.
pub const WEATHER_WINDOW_MS: i64 = 60_000;

/// Maximum age of cached event rows before re-fetch.
pub const EVENTS_WINDOW_MS: i64 = 15_000;

/// Maximum age of cached business rows before re-fetch.
pub const BUSINESS_WINDOW_MS: i64 = 15_000;

/// Maximum age of cached movie rows before re-fetch.
pub const MOVIES_WINDOW_MS: i64 = 15_000;

/// Expiry policy applied to a stored row set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Rows never expire (Location).
    Immutable,
    /// Rows older than the window (ms) are stale and must be re-fetched.
    Window(i64),
}

impl Freshness {
    /// Policy for a given entity kind.
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Location => Freshness::Immutable,
            EntityKind::Weather => Freshness::Window(WEATHER_WINDOW_MS),
            EntityKind::Event => Freshness::Window(EVENTS_WINDOW_MS),
            EntityKind::Business => Freshness::Window(BUSINESS_WINDOW_MS),
            EntityKind::Movie => Freshness::Window(MOVIES_WINDOW_MS),
        }
    }

    /// Classify a stored row set by the age of its first row.
    ///
    /// `created_at` and `now` are epoch milliseconds.
    pub fn is_stale(&self, created_at: i64, now: i64) -> bool {
        match self {
            Freshness::Immutable => false,
            Freshness::Window(window) => now - created_at > *window,
        }
    }
}
