//! geo-planner core
//!
//! Geocoding fallback chain and nearest-neighbor itinerary optimization for
//! transport dispatch. Invoked as a library by request handlers; no CLI.

pub mod cache;
pub mod config;
pub mod distance;
pub mod error;
pub mod fallback;
pub mod geocode;
pub mod limiter;
pub mod normalize;
pub mod optimizer;
pub mod osm;
pub mod primary;
pub mod report;
pub mod traits;
