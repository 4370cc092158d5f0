//! Offline fallback providers: neighborhood lookup table and city centroid.
//!
//! When no remote backend resolves an address, a known-neighborhood match
//! still gives drivers a usable point; failing that, the city centroid is
//! returned as an explicit approximation (`success = false`). Both apply a
//! small random offset so repeated fallbacks do not stack markers on the
//! exact same map pixel.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GeoConfig;
use crate::traits::{GeocodeProvider, GeocodeResult, GeocodeSource, ProviderOutcome};

/// Jitter amplitude for neighborhood matches, in degrees.
const NEIGHBORHOOD_JITTER_DEG: f64 = 0.003;

/// Jitter amplitude for the centroid fallback, in degrees.
const CENTROID_JITTER_DEG: f64 = 0.02;

/// Seedable marker-offset source. Disabled jitter returns exact coordinates,
/// which is what route-optimization tests want.
#[derive(Debug)]
pub struct Jitter {
    enabled: bool,
    rng: Mutex<StdRng>,
}

impl Jitter {
    pub fn new(enabled: bool, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            enabled,
            rng: Mutex::new(rng),
        }
    }

    pub fn from_config(config: &GeoConfig) -> Self {
        Self::new(config.jitter_enabled, config.jitter_seed)
    }

    fn offset(&self, amplitude: f64) -> (f64, f64) {
        if !self.enabled {
            return (0.0, 0.0);
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        (
            rng.gen_range(-amplitude..=amplitude),
            rng.gen_range(-amplitude..=amplitude),
        )
    }
}

/// Static mapping of known local neighborhood names to coordinates.
///
/// Matches when the lowercased address contains a neighborhood name.
/// The table is deployment data, not logic; see [`GeoConfig::neighborhoods`].
#[derive(Debug)]
pub struct NeighborhoodTable {
    entries: Vec<(String, (f64, f64))>,
    jitter: Jitter,
}

impl NeighborhoodTable {
    pub fn new(entries: Vec<(String, (f64, f64))>, jitter: Jitter) -> Self {
        Self { entries, jitter }
    }

    pub fn from_config(config: &GeoConfig) -> Self {
        Self::new(config.neighborhoods.clone(), Jitter::from_config(config))
    }
}

impl GeocodeProvider for NeighborhoodTable {
    fn id(&self) -> &'static str {
        "neighborhood_table"
    }

    fn resolve(&self, address: &str) -> ProviderOutcome {
        let lower = address.to_lowercase();
        for (name, (lat, lon)) in &self.entries {
            if !lower.contains(&name.to_lowercase()) {
                continue;
            }
            let (d_lat, d_lon) = self.jitter.offset(NEIGHBORHOOD_JITTER_DEG);
            tracing::debug!(neighborhood = %name, "matched neighborhood table");
            return ProviderOutcome::Found(GeocodeResult {
                latitude: lat + d_lat,
                longitude: lon + d_lon,
                formatted_address: format!("{} (quartier {})", address, name),
                success: true,
                source: GeocodeSource::NeighborhoodTable,
                confidence: 0.6,
                in_service_area: true,
            });
        }
        ProviderOutcome::NoMatch
    }
}

/// Terminal fallback: the configured city center, flagged as approximate.
#[derive(Debug)]
pub struct CityCentroid {
    centroid: (f64, f64),
    city: String,
    jitter: Jitter,
}

impl CityCentroid {
    pub fn new(centroid: (f64, f64), city: String, jitter: Jitter) -> Self {
        Self {
            centroid,
            city,
            jitter,
        }
    }

    pub fn from_config(config: &GeoConfig) -> Self {
        Self::new(
            config.city_centroid,
            config.city.clone(),
            Jitter::from_config(config),
        )
    }

    /// Always produces coordinates. `success` stays false: the point is a
    /// best-effort approximation, not a resolution of the address.
    pub fn approximate(&self, address: &str) -> GeocodeResult {
        let (d_lat, d_lon) = self.jitter.offset(CENTROID_JITTER_DEG);
        GeocodeResult {
            latitude: self.centroid.0 + d_lat,
            longitude: self.centroid.1 + d_lon,
            formatted_address: format!("{}, {} (approximatif)", address, self.city),
            success: false,
            source: GeocodeSource::CityCentroid,
            confidence: 0.4,
            in_service_area: true,
        }
    }
}

impl GeocodeProvider for CityCentroid {
    fn id(&self) -> &'static str {
        "city_centroid"
    }

    fn resolve(&self, address: &str) -> ProviderOutcome {
        ProviderOutcome::Found(self.approximate(address))
    }
}
