//! Weather provider client (Dark Sky-style forecast API).

use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use waypoint_core::{display_date, now_ms, Error, Forecast, Result};

/// Default weather API base URL.
pub const DEFAULT_WEATHER_URL: &str = "https://api.darksky.net";

/// Client for the weather provider.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    data: Vec<DailyForecast>,
}

#[derive(Debug, Deserialize)]
struct DailyForecast {
    summary: String,
    /// Provider-native epoch seconds.
    time: i64,
}

impl WeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(DEFAULT_WEATHER_URL.to_string(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetch the daily forecast for a coordinate pair.
    ///
    /// The provider's full response set is returned unmodified in count.
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Vec<Forecast>> {
        let start = Instant::now();
        let url = format!(
            "{}/forecast/{}/{},{}",
            self.base_url, self.api_key, latitude, longitude
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "weather provider returned {}",
                response.status()
            )));
        }
        let body: WeatherResponse = response.json().await?;
        let forecasts = normalize(body, now_ms());

        info!(
            subsystem = "providers",
            component = "weather",
            op = "fetch",
            result_count = forecasts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Weather fetch complete"
        );
        Ok(forecasts)
    }
}

/// Map daily forecast blocks into the canonical shape. The provider's epoch
/// seconds become a display date; `created_at` stamps the whole batch.
fn normalize(body: WeatherResponse, created_at: i64) -> Vec<Forecast> {
    body.daily
        .data
        .into_iter()
        .map(|day| Forecast {
            forecast: day.summary,
            time: display_date(day.time * 1000),
            created_at,
        })
        .collect()
}
