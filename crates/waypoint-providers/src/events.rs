//! Events provider client (Eventbrite search API).

use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use waypoint_core::{now_ms, Error, Event, Result};

/// Default events API base URL.
pub const DEFAULT_EVENTS_URL: &str = "https://www.eventbriteapi.com";

/// Search radius sent with every query.
pub const SEARCH_RADIUS: &str = "10km";

/// Maximum number of events persisted and returned per fetch.
pub const MAX_EVENTS: usize = 20;

/// Client for the events provider.
#[derive(Clone)]
pub struct EventsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    url: String,
    name: TextField,
    start: StartField,
    #[serde(default)]
    description: Option<TextField>,
}

#[derive(Debug, Deserialize)]
struct TextField {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StartField {
    local: String,
}

impl EventsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(DEFAULT_EVENTS_URL.to_string(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetch events near a coordinate pair, capped at [`MAX_EVENTS`] in
    /// provider response order.
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Vec<Event>> {
        let start = Instant::now();
        let url = format!(
            "{}/v3/events/search/?token={}&location.latitude={}&location.longitude={}&location.within={}",
            self.base_url, self.api_key, latitude, longitude, SEARCH_RADIUS
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "events provider returned {}",
                response.status()
            )));
        }
        let body: EventsResponse = response.json().await?;
        let events = normalize(body, now_ms());

        info!(
            subsystem = "providers",
            component = "events",
            op = "fetch",
            result_count = events.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Events fetch complete"
        );
        Ok(events)
    }
}

/// Map raw events into the canonical shape, truncating to the first
/// [`MAX_EVENTS`] without re-sorting.
fn normalize(body: EventsResponse, created_at: i64) -> Vec<Event> {
    body.events
        .into_iter()
        .take(MAX_EVENTS)
        .map(|raw| Event {
            link: raw.url,
            name: raw.name.text.unwrap_or_default(),
            event_date: raw.start.local,
            summary: raw
                .description
                .and_then(|d| d.text)
                .unwrap_or_default(),
            created_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_event_json(i: usize) -> String {
        format!(
            r#"{{
                "url": "https://events.example/e/{i}",
                "name": {{ "text": "Event {i}" }},
                "start": {{ "local": "2026-09-0{}T19:00:00" }},
                "description": {{ "text": "Description {i}" }}
            }}"#,
            (i % 9) + 1
        )
    }

    #[test]
    fn test_normalize_maps_fields() {
        let body: EventsResponse =
            serde_json::from_str(&format!(r#"{{ "events": [{}] }}"#, raw_event_json(1))).unwrap();
        let events = normalize(body, 7);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].link, "https://events.example/e/1");
        assert_eq!(events[0].name, "Event 1");
        assert_eq!(events[0].event_date, "2026-09-02T19:00:00");
        assert_eq!(events[0].summary, "Description 1");
        assert_eq!(events[0].created_at, 7);
    }

    #[test]
    fn test_normalize_truncates_35_to_20_in_order() {
        let raws: Vec<String> = (0..35).map(raw_event_json).collect();
        let body: EventsResponse =
            serde_json::from_str(&format!(r#"{{ "events": [{}] }}"#, raws.join(","))).unwrap();

        let events = normalize(body, 0);
        assert_eq!(events.len(), MAX_EVENTS);
        assert_eq!(events[0].name, "Event 0");
        assert_eq!(events[19].name, "Event 19");
    }

    #[test]
    fn test_normalize_tolerates_missing_description() {
        let body: EventsResponse = serde_json::from_str(
            r#"{ "events": [{
                "url": "https://events.example/e/1",
                "name": { "text": "No description" },
                "start": { "local": "2026-09-01T19:00:00" }
            }] }"#,
        )
        .unwrap();

        let events = normalize(body, 0);
        assert_eq!(events[0].summary, "");
    }
}
