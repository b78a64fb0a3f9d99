//! # waypoint-providers
//!
//! Thin HTTP clients for the five upstream data providers: geocoding,
//! weather, events, business search, and movie discovery.
//!
//! Each client exposes one asynchronous fetch that takes the geographic or
//! region parameters its provider needs and returns entities already mapped
//! into the canonical shapes from `waypoint-core` — callers never see wire
//! formats. Any network error or non-2xx status surfaces as
//! [`waypoint_core::Error::Provider`]; nothing is retried here.

pub mod business;
pub mod events;
pub mod geocode;
pub mod movies;
pub mod weather;

pub use business::{BusinessClient, MAX_BUSINESSES};
pub use events::{EventsClient, MAX_EVENTS, SEARCH_RADIUS};
pub use geocode::GeocodeClient;
pub use movies::MoviesClient;
pub use weather::WeatherClient;

use waypoint_core::Config;

/// All provider clients, constructed once at startup and shared.
#[derive(Clone)]
pub struct Providers {
    pub geocode: GeocodeClient,
    pub weather: WeatherClient,
    pub events: EventsClient,
    pub businesses: BusinessClient,
    pub movies: MoviesClient,
}

impl Providers {
    /// Build every client from the process configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            geocode: GeocodeClient::new(config.geocode_api_key.clone()),
            weather: WeatherClient::new(config.weather_api_key.clone()),
            events: EventsClient::new(config.eventbrite_api_key.clone()),
            businesses: BusinessClient::new(config.yelp_api_key.clone()),
            movies: MoviesClient::new(config.movie_api_key.clone()),
        }
    }
}
