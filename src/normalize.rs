//! Address cleanup before geocoding.
//!
//! Free-text addresses from planning sheets arrive with stray separators and
//! characters that break URL query encoding. Normalization is a pure,
//! idempotent function: running it twice yields the same string.

use crate::config::GeoConfig;

/// Cleans and canonicalizes free-text addresses for the configured locality.
#[derive(Debug, Clone)]
pub struct Normalizer {
    city: String,
    country: String,
    default_locality: String,
}

impl Normalizer {
    pub fn new(config: &GeoConfig) -> Self {
        Self {
            city: config.city.clone(),
            country: config.country.clone(),
            default_locality: config.default_locality.clone(),
        }
    }

    /// Normalize a raw address.
    ///
    /// Trims whitespace, strips `<>\'"`, unifies `;`, `|` and `/` to commas,
    /// collapses repeated whitespace, and appends the configured city/country
    /// when missing. Blank input maps to the default locality.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return self.default_locality.clone();
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '<' | '>' | '\\' | '\'' | '"'))
            .map(|c| match c {
                ';' | '|' | '/' => ',',
                other => other,
            })
            .collect();

        let address = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
        if address.is_empty() {
            return self.default_locality.clone();
        }

        let lower = address.to_lowercase();
        let has_city = lower.contains(&self.city.to_lowercase());
        let has_country = lower.contains(&self.country.to_lowercase());

        match (has_city, has_country) {
            (true, _) => address,
            (false, false) => format!("{}, {}, {}", address, self.city, self.country),
            (false, true) => format!("{}, {}", address, self.city),
        }
    }
}
