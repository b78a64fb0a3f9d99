//! Business-search provider client (Yelp Fusion API, bearer-token auth).

use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use waypoint_core::{now_ms, Business, Error, Result};

/// Default business-search API base URL.
pub const DEFAULT_BUSINESS_URL: &str = "https://api.yelp.com";

/// Maximum number of listings persisted and returned per fetch.
pub const MAX_BUSINESSES: usize = 20;

/// Client for the business-search provider.
#[derive(Clone)]
pub struct BusinessClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
struct BusinessResponse {
    #[serde(default)]
    businesses: Vec<RawBusiness>,
}

#[derive(Debug, Deserialize)]
struct RawBusiness {
    name: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    rating: f64,
    url: String,
}

impl BusinessClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(DEFAULT_BUSINESS_URL.to_string(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetch business listings near a coordinate pair, capped at
    /// [`MAX_BUSINESSES`] in provider response order.
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Vec<Business>> {
        let start = Instant::now();
        let url = format!(
            "{}/v3/businesses/search?latitude={}&longitude={}",
            self.base_url, latitude, longitude
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "business provider returned {}",
                response.status()
            )));
        }
        let body: BusinessResponse = response.json().await?;
        let listings = normalize(body, now_ms());

        info!(
            subsystem = "providers",
            component = "businesses",
            op = "fetch",
            result_count = listings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Business fetch complete"
        );
        Ok(listings)
    }
}

/// Map raw listings into the canonical shape, truncating to the first
/// [`MAX_BUSINESSES`] without re-sorting.
fn normalize(body: BusinessResponse, created_at: i64) -> Vec<Business> {
    body.businesses
        .into_iter()
        .take(MAX_BUSINESSES)
        .map(|raw| Business {
            name: raw.name,
            image_url: raw.image_url,
            price: raw.price.unwrap_or_default(),
            rating: raw.rating,
            url: raw.url,
            created_at,
        })
        .collect()
}
