//! Geocoding pipeline: normalize, cache, then walk the provider chain.
//!
//! One [`Geocoder`] instance is constructed at application start and passed
//! by reference to request handlers; the cache it owns is the only state
//! shared across requests. Providers are tried strictly in order and the
//! first usable result wins. The pipeline never fails outright: when every
//! backend comes up empty, the city-centroid fallback still produces an
//! approximate point, because downstream routing needs coordinates to
//! function at all.

use crate::cache::{GeocodeCache, cache_key};
use crate::config::GeoConfig;
use crate::error::GeoError;
use crate::fallback::{CityCentroid, Jitter, NeighborhoodTable};
use crate::limiter::RateLimiter;
use crate::normalize::Normalizer;
use crate::osm::{OsmClient, OsmConfig};
use crate::primary::{PrimaryApiClient, PrimaryApiConfig};
use crate::traits::{GeocodeProvider, GeocodeResult, ProviderOutcome};

pub type BoxedProvider = Box<dyn GeocodeProvider>;

/// Build the standard remote chain: primary API (when a key is configured)
/// followed by the OSM fallback.
pub fn standard_chain(
    primary: Option<PrimaryApiConfig>,
    osm: OsmConfig,
) -> Result<Vec<BoxedProvider>, GeoError> {
    let mut chain: Vec<BoxedProvider> = Vec::new();
    if let Some(primary) = primary {
        chain.push(Box::new(PrimaryApiClient::new(primary)?));
    } else {
        tracing::warn!("no primary geocoding API key configured, skipping provider");
    }
    chain.push(Box::new(OsmClient::new(osm)?));
    Ok(chain)
}

/// Address-to-coordinates service with caching, pacing and fallbacks.
pub struct Geocoder {
    config: GeoConfig,
    normalizer: Normalizer,
    cache: GeocodeCache,
    limiter: RateLimiter,
    providers: Vec<BoxedProvider>,
    neighborhoods: NeighborhoodTable,
    centroid: CityCentroid,
}

impl Geocoder {
    /// Build a geocoder over the given remote providers. The neighborhood
    /// table and city-centroid fallbacks always terminate the chain.
    pub fn new(config: GeoConfig, providers: Vec<BoxedProvider>) -> Self {
        let normalizer = Normalizer::new(&config);
        let cache = GeocodeCache::new(config.cache_ttl);
        let neighborhoods = NeighborhoodTable::new(
            config.neighborhoods.clone(),
            Jitter::from_config(&config),
        );
        let centroid = CityCentroid::new(
            config.city_centroid,
            config.city.clone(),
            Jitter::from_config(&config),
        );
        Self {
            config,
            normalizer,
            cache,
            limiter: RateLimiter::new(),
            providers,
            neighborhoods,
            centroid,
        }
    }

    /// Offline geocoder: neighborhood table and centroid only.
    pub fn offline(config: GeoConfig) -> Self {
        Self::new(config, Vec::new())
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    /// Resolve one free-text address. Never fails: the weakest outcome is an
    /// approximate city-centroid point with `success = false`.
    pub fn geocode_address(&self, address: &str) -> GeocodeResult {
        let normalized = self.normalizer.normalize(address);
        let key = cache_key(&normalized);

        if let Some(cached) = self.cache.get(key) {
            tracing::debug!(address = %normalized, "cache hit");
            return cached;
        }

        tracing::debug!(address = %normalized, "geocoding");

        for provider in self
            .providers
            .iter()
            .map(|p| p.as_ref())
            .chain(std::iter::once(&self.neighborhoods as &dyn GeocodeProvider))
        {
            if provider.is_remote() {
                self.limiter
                    .wait_if_needed(provider.id(), self.config.provider_min_interval);
            }
            match provider.resolve(&normalized) {
                ProviderOutcome::Found(result) => {
                    let result = self.finalize(result);
                    self.cache.put(key, result.clone());
                    tracing::debug!(
                        provider = provider.id(),
                        in_area = result.in_service_area,
                        "resolved"
                    );
                    return result;
                }
                ProviderOutcome::NoMatch => {
                    tracing::debug!(provider = provider.id(), "no match, trying next");
                }
                ProviderOutcome::RateLimited => {
                    tracing::warn!(provider = provider.id(), "rate limited, trying next");
                }
                ProviderOutcome::Unavailable => {
                    tracing::debug!(provider = provider.id(), "unavailable, trying next");
                }
            }
        }

        // Terminal fallback; cached too, so unresolvable addresses stop
        // hammering the providers.
        let result = self.finalize(self.centroid.approximate(&normalized));
        self.cache.put(key, result.clone());
        tracing::info!(address = %normalized, "all providers failed, centroid fallback");
        result
    }

    /// Resolve a batch of addresses, order-preserving and 1:1 with the input.
    /// Lookups are sequential with courtesy pacing between them; per-address
    /// failures degrade to the centroid fallback instead of aborting.
    pub fn batch_geocode(&self, addresses: &[String]) -> Vec<GeocodeResult> {
        tracing::info!(count = addresses.len(), "batch geocoding");

        let mut results = Vec::with_capacity(addresses.len());
        for (i, address) in addresses.iter().enumerate() {
            results.push(self.geocode_address(address));
            if i + 1 < addresses.len() {
                std::thread::sleep(self.config.batch_pacing);
            }
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        tracing::info!(
            succeeded,
            failed = results.len() - succeeded,
            "batch geocoding done"
        );
        results
    }

    /// Evaluate the service-area flag against the configured bounding box.
    fn finalize(&self, mut result: GeocodeResult) -> GeocodeResult {
        result.in_service_area = self
            .config
            .service_area
            .contains(result.latitude, result.longitude);
        result
    }
}
