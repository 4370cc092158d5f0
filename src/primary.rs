//! Primary geocoding backend (PositionStack-style forward API).
//!
//! License-key gated. Queries carry country/region hints and request a single
//! result. HTTP 429 is reported as a distinct rate-limit signal; every other
//! failure is soft and lets the chain fall through.

use std::time::Duration;

use serde::Deserialize;

use crate::traits::{GeocodeProvider, GeocodeResult, GeocodeSource, ProviderOutcome};

#[derive(Debug, Clone)]
pub struct PrimaryApiConfig {
    pub base_url: String,
    pub api_key: String,
    /// ISO country filter, e.g. "TN".
    pub country: String,
    /// Region hint, e.g. "Sousse".
    pub region: String,
    pub timeout: Duration,
}

impl PrimaryApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "http://api.positionstack.com/v1/forward".to_string(),
            api_key: api_key.into(),
            country: "TN".to_string(),
            region: "Sousse".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrimaryApiClient {
    config: PrimaryApiConfig,
    client: reqwest::blocking::Client,
}

impl PrimaryApiClient {
    pub fn new(config: PrimaryApiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }
}

impl GeocodeProvider for PrimaryApiClient {
    fn id(&self) -> &'static str {
        "primary_api"
    }

    fn is_remote(&self) -> bool {
        true
    }

    fn resolve(&self, address: &str) -> ProviderOutcome {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("access_key", self.config.api_key.as_str()),
                ("query", address),
                ("country", self.config.country.as_str()),
                ("region", self.config.region.as_str()),
                ("limit", "1"),
                ("output", "json"),
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
                tracing::warn!(provider = self.id(), "rate limited (429)");
                return ProviderOutcome::RateLimited;
            }
            status => {
                tracing::warn!(provider = self.id(), status, "unexpected status");
                return ProviderOutcome::Unavailable;
            }
        }

        let body: ForwardResponse = match response.json() {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(provider = self.id(), error = %err, "bad response body");
                return ProviderOutcome::Unavailable;
            }
        };

        let Some(hit) = body.data.into_iter().flatten().next() else {
            tracing::debug!(provider = self.id(), "no result");
            return ProviderOutcome::NoMatch;
        };

        ProviderOutcome::Found(GeocodeResult {
            latitude: hit.latitude,
            longitude: hit.longitude,
            formatted_address: hit.label.unwrap_or_else(|| address.to_string()),
            success: true,
            source: GeocodeSource::PrimaryApi,
            confidence: hit.confidence.unwrap_or(0.0),
            in_service_area: false,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ForwardResponse {
    data: Option<Vec<ForwardHit>>,
}

#[derive(Debug, Deserialize)]
struct ForwardHit {
    latitude: f64,
    longitude: f64,
    label: Option<String>,
    confidence: Option<f64>,
}
