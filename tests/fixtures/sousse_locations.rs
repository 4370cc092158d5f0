//! Real Sousse-area locations for realistic test fixtures.
//!
//! Coordinates match the default neighborhood table so offline geocoding
//! resolves these addresses deterministically.

use geo_planner::optimizer::Waypoint;
use geo_planner::report::{AgentRecord, HourValue};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

// ============================================================================
// Pickup/drop-off neighborhoods (northern Sousse)
// ============================================================================

pub const NORTH_STOPS: &[Location] = &[
    Location::new("Sahloul 1", 35.8350, 10.5960),
    Location::new("Sahloul 2", 35.8385, 10.5930),
    Location::new("Sahloul 4", 35.8450, 10.5850),
    Location::new("Khezama Est", 35.8525, 10.6150),
    Location::new("Khezama Ouest", 35.8485, 10.6050),
    Location::new("Hammam Sousse", 35.8580, 10.5980),
];

// ============================================================================
// Pickup/drop-off neighborhoods (southern Sousse / Msaken)
// ============================================================================

pub const SOUTH_STOPS: &[Location] = &[
    Location::new("Riadh 1", 35.8085, 10.5920),
    Location::new("Riadh 2", 35.8110, 10.5880),
    Location::new("Riadh 5", 35.7980, 10.5750),
    Location::new("Msaken Centre", 35.7300, 10.5850),
    Location::new("Sidi Abdelhamid", 35.7950, 10.6350),
];

/// City-center depot, a natural route start.
pub const DEPOT: Location = Location::new("Médina Sousse", 35.8275, 10.6392);

/// Build a waypoint at a fixture location.
pub fn waypoint(location: &Location) -> Waypoint {
    Waypoint {
        name: location.name.to_string(),
        address: format!("{}, Sousse, Tunisie", location.name),
        latitude: location.lat,
        longitude: location.lon,
        company: "Société Test".to_string(),
        phone: "+216 00 000 000".to_string(),
        original_index: 0,
        visiting_order: 0,
    }
}

/// Build an agent planning row whose address names a fixture location.
pub fn agent(id: i64, location: &Location, hour: Option<HourValue>) -> AgentRecord {
    AgentRecord {
        id: Some(id),
        name: format!("Agent {}", id),
        address: format!("{}, Sousse, Tunisie", location.name),
        company: "Société Test".to_string(),
        phone: "+216 00 000 000".to_string(),
        hour,
    }
}
