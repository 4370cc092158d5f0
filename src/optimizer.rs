//! Route ordering via the nearest-neighbor heuristic.
//!
//! Routes here are tens of stops at most and the caller waits on a live HTTP
//! request, so an O(N²) greedy pass over a distance matrix is the right
//! trade: materially better than an arbitrary order, with no solver latency.
//! Drivers deviate anyway; exactness is not required.

use serde::{Deserialize, Serialize};

use crate::config::GeoConfig;
use crate::distance::DistanceMatrix;

/// A stop to visit: agent pickup/drop-off location with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
    /// 0-based position in the input, for traceability.
    #[serde(default)]
    pub original_index: usize,
    /// 1-based position in the visit sequence; 0 until assigned.
    #[serde(default)]
    pub visiting_order: usize,
}

impl Waypoint {
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Ordered itinerary with distance statistics. Recomputed on every call,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Permutation of the input waypoints in visit order.
    pub ordered_waypoints: Vec<Waypoint>,
    /// Input indices in visit order.
    pub visiting_index_order: Vec<usize>,
    pub total_distance_km: f64,
    pub average_leg_km: f64,
    pub max_leg_km: f64,
    pub min_leg_km: f64,
    pub point_count: usize,
    pub start_point: String,
    pub end_point: String,
    pub was_optimized: bool,
    pub estimated_savings_km: f64,
    pub estimated_minutes: f64,
}

/// Nearest-neighbor route optimizer.
#[derive(Debug, Clone)]
pub struct RouteOptimizer {
    /// Assumed improvement over an unordered route; unvalidated heuristic.
    pub savings_factor: f64,
    /// Assumed average driving speed for time estimates.
    pub average_speed_kmh: f64,
}

impl Default for RouteOptimizer {
    fn default() -> Self {
        Self {
            savings_factor: 0.15,
            average_speed_kmh: 40.0,
        }
    }
}

impl RouteOptimizer {
    pub fn new(savings_factor: f64, average_speed_kmh: f64) -> Self {
        Self {
            savings_factor,
            average_speed_kmh,
        }
    }

    pub fn from_config(config: &GeoConfig) -> Self {
        Self::new(config.savings_factor, config.average_speed_kmh)
    }

    /// Order the waypoints starting from `start_index` (clamped to 0 when out
    /// of range). Ties between equally-near candidates break toward the
    /// lowest index so the result is deterministic.
    pub fn optimize(&self, points: &[Waypoint], start_index: usize) -> RouteResult {
        let n = points.len();
        if n < 2 {
            return self.trivial_route(points);
        }

        tracing::debug!(points = n, "optimizing itinerary");

        let locations: Vec<(f64, f64)> = points.iter().map(Waypoint::location).collect();
        let matrix = DistanceMatrix::build(&locations);

        let start = if start_index < n { start_index } else { 0 };
        let mut order = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        order.push(start);
        visited[start] = true;

        while order.len() < n {
            let current = order[order.len() - 1];
            let mut nearest: Option<usize> = None;
            let mut nearest_distance = f64::INFINITY;
            for candidate in 0..n {
                if visited[candidate] {
                    continue;
                }
                let d = matrix.get(current, candidate);
                if d < nearest_distance {
                    nearest_distance = d;
                    nearest = Some(candidate);
                }
            }
            // n > order.len() guarantees an unvisited candidate exists
            if let Some(next) = nearest {
                order.push(next);
                visited[next] = true;
            } else {
                break;
            }
        }

        let legs: Vec<f64> = order
            .windows(2)
            .map(|pair| matrix.get(pair[0], pair[1]))
            .collect();
        let total: f64 = legs.iter().sum();

        let (average, max, min) = if legs.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                total / legs.len() as f64,
                legs.iter().cloned().fold(f64::MIN, f64::max),
                legs.iter().cloned().fold(f64::MAX, f64::min),
            )
        };

        let ordered_waypoints: Vec<Waypoint> = order
            .iter()
            .enumerate()
            .map(|(rank, &idx)| {
                let mut point = points[idx].clone();
                point.original_index = idx;
                point.visiting_order = rank + 1;
                point
            })
            .collect();

        let result = RouteResult {
            start_point: ordered_waypoints[0].name.clone(),
            end_point: ordered_waypoints[n - 1].name.clone(),
            ordered_waypoints,
            visiting_index_order: order,
            total_distance_km: round2(total),
            average_leg_km: round2(average),
            max_leg_km: round2(max),
            min_leg_km: round2(min),
            point_count: n,
            was_optimized: true,
            estimated_savings_km: round2(total * self.savings_factor),
            estimated_minutes: round1(total / self.average_speed_kmh * 60.0),
        };

        tracing::info!(
            total_km = result.total_distance_km,
            savings_km = result.estimated_savings_km,
            "itinerary optimized"
        );

        result
    }

    /// 0 or 1 points: nothing to optimize, return the input as-is.
    fn trivial_route(&self, points: &[Waypoint]) -> RouteResult {
        let ordered_waypoints: Vec<Waypoint> = points
            .iter()
            .enumerate()
            .map(|(idx, point)| {
                let mut point = point.clone();
                point.original_index = idx;
                point.visiting_order = idx + 1;
                point
            })
            .collect();

        RouteResult {
            visiting_index_order: (0..points.len()).collect(),
            total_distance_km: 0.0,
            average_leg_km: 0.0,
            max_leg_km: 0.0,
            min_leg_km: 0.0,
            point_count: points.len(),
            start_point: points.first().map(|p| p.name.clone()).unwrap_or_default(),
            end_point: points.last().map(|p| p.name.clone()).unwrap_or_default(),
            was_optimized: false,
            estimated_savings_km: 0.0,
            estimated_minutes: 0.0,
            ordered_waypoints,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
