//! Geocoding provider client (Google Maps Geocode API).

use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use waypoint_core::{Error, NewLocation, Result, DEFAULT_REGION};

/// Default geocoding API base URL.
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com";

/// Client for the geocoding provider.
#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl GeocodeClient {
    /// Create a new geocode client with the default base URL.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(DEFAULT_GEOCODE_URL.to_string(), api_key)
    }

    /// Create a geocode client against a custom base URL.
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Geocode a free-text place query into a location value.
    ///
    /// Returns [`Error::NotFound`] when the provider has no result for the
    /// query, and [`Error::Provider`] for network or non-2xx failures.
    pub async fn geocode(&self, query: &str) -> Result<NewLocation> {
        let start = Instant::now();
        let url = format!(
            "{}/maps/api/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "geocode provider returned {}",
                response.status()
            )));
        }
        let body: GeocodeResponse = response.json().await?;

        info!(
            subsystem = "providers",
            component = "geocode",
            op = "fetch",
            result_count = body.results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Geocode fetch complete"
        );

        normalize(query, body)
    }
}

/// Map the provider payload into the canonical location shape.
fn normalize(query: &str, body: GeocodeResponse) -> Result<NewLocation> {
    let first = body
        .results
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("no geocode result for '{query}'")))?;

    let region_code = region_from_components(&first.address_components);
    debug!(
        subsystem = "providers",
        component = "geocode",
        region_code = %region_code,
        "Derived region code"
    );

    Ok(NewLocation {
        search_query: query.to_string(),
        formatted_query: first.formatted_address,
        latitude: first.geometry.location.lat,
        longitude: first.geometry.location.lng,
        region_code,
    })
}

/// Region code from the country address component, falling back to
/// [`DEFAULT_REGION`] when absent.
fn region_from_components(components: &[AddressComponent]) -> String {
    components
        .iter()
        .find(|c| c.types.iter().any(|t| t == "country"))
        .map(|c| c.short_name.clone())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}
