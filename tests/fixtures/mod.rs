//! Test fixtures for geo-planner.
//!
//! Provides realistic test data:
//! - Real Sousse-area locations matching the default neighborhood table
//! - Builders for waypoints and agent planning rows

pub mod sousse_locations;

pub use sousse_locations::*;
