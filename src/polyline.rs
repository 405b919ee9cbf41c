//! Polyline representation for route geometries.
//!
//! This module provides a type for working with polylines as decoded
//! coordinate sequences. Encoding/decoding happens at the boundary
//! (when receiving from OSRM or sending to the frontend).

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;
use crate::traits::Coord;

/// A polyline representing a route geometry as decoded coordinates.
///
/// Stores (longitude, latitude) points directly for internal processing,
/// matching the GeoJSON axis order used on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coord>,
}

impl Polyline {
    /// Creates a new Polyline from decoded (lon, lat) points.
    pub fn new(points: Vec<Coord>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coord> {
        self.points
    }

    /// Total great-circle length of the polyline in kilometers.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_km(pair[0], pair[1]))
            .sum()
    }

    /// Point reached after traveling `distance_km` along the polyline.
    ///
    /// Interpolates linearly within the containing segment. Returns the
    /// last point when the distance exceeds the polyline's length, and
    /// `None` for an empty polyline.
    pub fn point_at_km(&self, distance_km: f64) -> Option<Coord> {
        let (first, rest) = self.points.split_first()?;
        if distance_km <= 0.0 {
            return Some(*first);
        }

        let mut traveled = 0.0;
        let mut prev = *first;
        for &next in rest {
            let segment = haversine_km(prev, next);
            if segment > 0.0 && traveled + segment >= distance_km {
                let fraction = (distance_km - traveled) / segment;
                return Some((
                    prev.0 + (next.0 - prev.0) * fraction,
                    prev.1 + (next.1 - prev.1) * fraction,
                ));
            }
            traveled += segment;
            prev = next;
        }

        Some(prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_points() {
        let points = vec![(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
    }

    #[test]
    fn test_into_points() {
        let points = vec![(-120.2, 38.5), (-120.95, 40.7)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = Polyline::new(vec![]);
        assert!(polyline.points().is_empty());
        assert_eq!(polyline.length_km(), 0.0);
        assert_eq!(polyline.point_at_km(10.0), None);
    }

    #[test]
    fn test_length_of_straight_line() {
        // Two points one degree of latitude apart: ~111 km.
        let polyline = Polyline::new(vec![(0.0, 0.0), (0.0, 1.0)]);
        let length = polyline.length_km();
        assert!(length > 110.0 && length < 112.0, "got {}", length);
    }

    #[test]
    fn test_point_at_zero_is_start() {
        let polyline = Polyline::new(vec![(-87.6, 41.8), (-86.1, 39.7)]);
        assert_eq!(polyline.point_at_km(0.0), Some((-87.6, 41.8)));
    }

    #[test]
    fn test_point_beyond_end_is_last() {
        let polyline = Polyline::new(vec![(-87.6, 41.8), (-86.1, 39.7)]);
        assert_eq!(polyline.point_at_km(1e6), Some((-86.1, 39.7)));
    }

    #[test]
    fn test_point_at_midpoint() {
        let polyline = Polyline::new(vec![(0.0, 0.0), (0.0, 1.0)]);
        let half = polyline.length_km() / 2.0;
        let (lon, lat) = polyline.point_at_km(half).unwrap();
        assert!(lon.abs() < 1e-9);
        assert!((lat - 0.5).abs() < 0.01, "got {}", lat);
    }

    #[test]
    fn test_point_skips_duplicate_vertices() {
        let polyline = Polyline::new(vec![(0.0, 0.0), (0.0, 0.0), (0.0, 1.0)]);
        let (_, lat) = polyline.point_at_km(polyline.length_km() / 2.0).unwrap();
        assert!((lat - 0.5).abs() < 0.01, "got {}", lat);
    }
}
