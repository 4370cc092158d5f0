//! Error types for the geocoding and itinerary pipeline.
//!
//! The pipeline itself is designed not to fail for degraded conditions
//! (provider down, address unresolvable): those degrade to approximate
//! coordinates instead. Errors here cover construction problems, rejected
//! coordinate corrections, and map-rendering failures.

use std::fmt;

#[derive(Debug)]
pub enum GeoError {
    /// HTTP client construction or transport failure.
    Http(reqwest::Error),
    /// Rejected latitude/longitude when correcting stored coordinates.
    InvalidCoordinates(String),
    /// Map-rendering collaborator reported a failure.
    Render(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::Http(err) => write!(f, "http error: {}", err),
            GeoError::InvalidCoordinates(msg) => write!(f, "invalid coordinates: {}", msg),
            GeoError::Render(msg) => write!(f, "map rendering failed: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeoError {
    fn from(err: reqwest::Error) -> Self {
        GeoError::Http(err)
    }
}

/// Validate a latitude/longitude pair before accepting a manual correction.
///
/// Rejects non-finite values and out-of-range coordinates with an explicit
/// message; no partial acceptance.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), GeoError> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(GeoError::InvalidCoordinates(
            "latitude and longitude must be finite numbers".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(GeoError::InvalidCoordinates(format!(
            "latitude {} out of range [-90, 90]",
            latitude
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(GeoError::InvalidCoordinates(format!(
            "longitude {} out of range [-180, 180]",
            longitude
        )));
    }
    Ok(())
}
