//! Great-circle distances and distance matrices.
//!
//! Haversine over a spherical Earth is accurate to well under a percent at
//! city scale, which is all the nearest-neighbor heuristic needs. Distances
//! are deterministic and symmetric.

use rayon::prelude::*;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two (lat, lon) points in kilometers.
pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Symmetric N×N distance matrix with a zero diagonal.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    values: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn build(points: &[(f64, f64)]) -> Self {
        let values = points
            .par_iter()
            .map(|from| {
                points
                    .iter()
                    .map(|to| {
                        if from == to {
                            0.0
                        } else {
                            distance_km(*from, *to)
                        }
                    })
                    .collect()
            })
            .collect();

        Self { values }
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from][to]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Travel estimate for one leg at an assumed average speed.
#[derive(Debug, Clone, PartialEq)]
pub struct LegEstimate {
    pub distance_km: f64,
    pub minutes: f64,
    pub seconds: f64,
}

/// Estimate travel time between two points from straight-line distance.
pub fn estimate_leg(from: (f64, f64), to: (f64, f64), speed_kmh: f64) -> LegEstimate {
    let distance = distance_km(from, to);
    let hours = distance / speed_kmh;
    LegEstimate {
        distance_km: distance,
        minutes: hours * 60.0,
        seconds: hours * 3600.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOUSSE: (f64, f64) = (35.8256, 10.6415);
    const TUNIS: (f64, f64) = (36.8065, 10.1815);

    #[test]
    fn same_point_is_zero() {
        assert!(distance_km(SOUSSE, SOUSSE) < 1e-9);
    }

    #[test]
    fn known_distance_sousse_tunis() {
        // Roughly 116 km as the crow flies
        let d = distance_km(SOUSSE, TUNIS);
        assert!(d > 105.0 && d < 125.0, "expected ~116 km, got {}", d);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (SOUSSE, TUNIS),
            ((35.8350, 10.5960), (35.7300, 10.5850)),
            ((0.0, 0.0), (0.0, 1.0)),
        ];
        for (a, b) in pairs {
            let forward = distance_km(a, b);
            let back = distance_km(b, a);
            assert!((forward - back).abs() < 1e-9);
        }
    }

    #[test]
    fn one_degree_of_latitude() {
        // One degree of latitude is ~111.2 km everywhere
        let d = distance_km((0.0, 0.0), (1.0, 0.0));
        assert!((d - 111.2).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn matrix_diagonal_is_zero() {
        let points = vec![SOUSSE, TUNIS, (35.84, 10.59)];
        let matrix = DistanceMatrix::build(&points);
        for i in 0..points.len() {
            assert_eq!(matrix.get(i, i), 0.0);
        }
    }

    #[test]
    fn matrix_is_symmetric() {
        let points = vec![SOUSSE, TUNIS, (35.84, 10.59), (35.73, 10.58)];
        let matrix = DistanceMatrix::build(&points);
        for i in 0..points.len() {
            for j in 0..points.len() {
                assert!((matrix.get(i, j) - matrix.get(j, i)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn matrix_matches_pairwise_distance() {
        let points = vec![SOUSSE, TUNIS];
        let matrix = DistanceMatrix::build(&points);
        assert_eq!(matrix.get(0, 1), distance_km(SOUSSE, TUNIS));
    }

    #[test]
    fn leg_estimate_uses_average_speed() {
        // 1 degree of latitude at 40 km/h: ~111 km, ~167 minutes
        let leg = estimate_leg((0.0, 0.0), (1.0, 0.0), 40.0);
        assert!((leg.minutes - leg.distance_km / 40.0 * 60.0).abs() < 1e-9);
        assert!((leg.seconds - leg.minutes * 60.0).abs() < 1e-9);
    }
}
