//! Core seams of the geocoding pipeline.
//!
//! Geocoding backends implement [`GeocodeProvider`] and are tried in order
//! until one reports a usable result. Map rendering is an external
//! collaborator behind [`MapRenderer`]; the pipeline only consumes the
//! artifact reference it returns.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::optimizer::Waypoint;

/// Which backend produced a geocode result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeSource {
    PrimaryApi,
    OsmFallback,
    NeighborhoodTable,
    CityCentroid,
}

/// Resolved coordinates for one address.
///
/// Immutable once created; cached by normalized-address key. `success` is
/// false when the coordinates are only a best-effort approximation (terminal
/// city-centroid fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    pub success: bool,
    pub source: GeocodeSource,
    /// Trustworthiness score in [0, 1].
    pub confidence: f64,
    /// Whether the point lies inside the configured service bounding box.
    pub in_service_area: bool,
}

/// Outcome of a single provider attempt.
#[derive(Debug, Clone)]
pub enum ProviderOutcome {
    /// Provider produced coordinates.
    Found(GeocodeResult),
    /// Provider answered but had no match for this address.
    NoMatch,
    /// Provider signalled a rate limit (HTTP 429); try the next one.
    RateLimited,
    /// Timeout, network failure, or provider not configured.
    Unavailable,
}

/// A geocoding backend in the fallback chain.
pub trait GeocodeProvider: Send + Sync {
    /// Stable identifier, used for rate-limiter bookkeeping and logging.
    fn id(&self) -> &'static str;

    /// Resolve a normalized address to coordinates.
    fn resolve(&self, address: &str) -> ProviderOutcome;

    /// Whether this provider issues network requests and needs pacing.
    fn is_remote(&self) -> bool {
        false
    }
}

/// Reference to a rendered map, as returned by the rendering collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapArtifact {
    pub url: Option<String>,
    pub filepath: Option<String>,
}

/// External map-rendering collaborator.
///
/// The pipeline hands over the ordered stops and a title; how the map is
/// produced (tiles, markers, storage) is out of scope here.
pub trait MapRenderer {
    fn render(&self, stops: &[Waypoint], title: &str) -> Result<MapArtifact, GeoError>;
}

/// Renderer for deployments (and tests) without a map backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl MapRenderer for NullRenderer {
    fn render(&self, _stops: &[Waypoint], _title: &str) -> Result<MapArtifact, GeoError> {
        Ok(MapArtifact::default())
    }
}
