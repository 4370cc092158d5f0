//! Free OSM-based geocoding fallback (Nominatim-style search API).
//!
//! Requires a descriptive User-Agent per the service's usage policy. On 429
//! the client pauses briefly and gives up on this provider for the call.

use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::traits::{GeocodeProvider, GeocodeResult, GeocodeSource, ProviderOutcome};

/// Default confidence for OSM hits; the API does not report one.
const OSM_DEFAULT_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct OsmConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Lowercase ISO country filter, e.g. "tn".
    pub country_codes: String,
    /// Preferred result language.
    pub language: String,
    pub timeout: Duration,
    /// Pause before giving up after a 429.
    pub rate_limit_pause: Duration,
}

impl Default for OsmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: "geo-planner/0.1 (dispatch@transport.example)".to_string(),
            country_codes: "tn".to_string(),
            language: "fr".to_string(),
            timeout: Duration::from_secs(5),
            rate_limit_pause: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsmClient {
    config: OsmConfig,
    client: reqwest::blocking::Client,
}

impl OsmClient {
    pub fn new(config: OsmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, client })
    }
}

impl GeocodeProvider for OsmClient {
    fn id(&self) -> &'static str {
        "osm_fallback"
    }

    fn is_remote(&self) -> bool {
        true
    }

    fn resolve(&self, address: &str) -> ProviderOutcome {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("q", address),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.config.country_codes.as_str()),
                ("accept-language", self.config.language.as_str()),
            ])
            .send();

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(provider = self.id(), error = %err, "request failed");
                return ProviderOutcome::Unavailable;
            }
        };

        match response.status().as_u16() {
            200 => {}
            429 => {
                tracing::warn!(provider = self.id(), "rate limited (429), pausing");
                thread::sleep(self.config.rate_limit_pause);
                return ProviderOutcome::RateLimited;
            }
            status => {
                tracing::warn!(provider = self.id(), status, "unexpected status");
                return ProviderOutcome::Unavailable;
            }
        }

        let hits: Vec<SearchHit> = match response.json() {
            Ok(hits) => hits,
            Err(err) => {
                tracing::warn!(provider = self.id(), error = %err, "bad response body");
                return ProviderOutcome::Unavailable;
            }
        };

        let Some(hit) = hits.into_iter().next() else {
            tracing::debug!(provider = self.id(), "no result");
            return ProviderOutcome::NoMatch;
        };

        // Nominatim serializes coordinates as strings
        let (Ok(latitude), Ok(longitude)) = (hit.lat.parse::<f64>(), hit.lon.parse::<f64>())
        else {
            tracing::warn!(provider = self.id(), "unparsable coordinates");
            return ProviderOutcome::NoMatch;
        };

        ProviderOutcome::Found(GeocodeResult {
            latitude,
            longitude,
            formatted_address: hit.display_name.unwrap_or_else(|| address.to_string()),
            success: true,
            source: GeocodeSource::OsmFallback,
            confidence: OSM_DEFAULT_CONFIDENCE,
            in_service_area: false,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: Option<String>,
}
