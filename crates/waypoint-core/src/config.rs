//! Process configuration loaded from the environment.
//!
//! `.env` loading (dotenvy) happens in the binary's main before this module
//! reads anything; everything here is plain `std::env::var` parsing so the
//! config stays testable without a filesystem.

use crate::error::{Error, Result};

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Typed process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string.
    pub database_url: String,
    /// HTTP listen port.
    pub port: u16,
    /// Google geocoding API key.
    pub geocode_api_key: String,
    /// Weather provider API key.
    pub weather_api_key: String,
    /// Eventbrite API token.
    pub eventbrite_api_key: String,
    /// Yelp bearer token.
    pub yelp_api_key: String,
    /// Movie discovery API key.
    pub movie_api_key: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Missing required variables produce an [`Error::Config`] naming the
    /// variable, so startup fails loudly instead of at first request.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            geocode_api_key: require("GEOCODE_API_KEY")?,
            weather_api_key: require("WEATHER_API_KEY")?,
            eventbrite_api_key: require("EVENTBRITE_API_KEY")?,
            yelp_api_key: require("YELP_API_KEY")?,
            movie_api_key: require("MOVIE_API_KEY")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("missing required environment variable {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing_names_variable() {
        let err = require("WAYPOINT_TEST_DOES_NOT_EXIST").unwrap_err();
        assert!(err
            .to_string()
            .contains("WAYPOINT_TEST_DOES_NOT_EXIST"));
    }

    #[test]
    fn test_default_port() {
        assert_eq!(DEFAULT_PORT, 3000);
    }
}
