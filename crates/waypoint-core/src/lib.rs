//! # waypoint-core
//!
//! Core types, errors, and policy for the waypoint aggregation proxy.
//!
//! This crate provides the foundational data structures the other waypoint
//! crates depend on: the canonical entity shapes, the error taxonomy, the
//! per-kind freshness policy, and process configuration.

pub mod config;
pub mod error;
pub mod freshness;
pub mod logging;
pub mod models;
pub mod time;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{Error, Result};
pub use freshness::Freshness;
pub use models::{
    Business, CacheEntity, EntityKind, Event, Forecast, Location, LocationKey, Movie, NewLocation,
    DEFAULT_REGION,
};
pub use time::{display_date, now_ms};
