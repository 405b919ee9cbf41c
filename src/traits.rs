//! Core geo-service trait for the trip planner.
//!
//! Everything the planner needs from a map backend goes through this one
//! interface, which is the natural seam for dependency injection: a
//! network-backed implementation lives in [`crate::osrm`], and tests supply
//! a deterministic fake.

use crate::error::{Error, Result};
use crate::polyline::Polyline;

/// A (longitude, latitude) coordinate pair, matching the GeoJSON axis
/// order used on the wire.
pub type Coord = (f64, f64);

/// Map/geo capabilities consumed by the planner.
pub trait GeoService {
    /// Resolves free-text addresses to coordinates, preserving order.
    ///
    /// Fails with [`Error::InvalidAddress`] if any address cannot be
    /// resolved, [`Error::GeoService`] for any other failure.
    fn resolve(&self, addresses: &[&str]) -> Result<Vec<Coord>>;

    /// Drive durations in hours between each consecutive coordinate pair.
    fn leg_durations(&self, coords: &[Coord]) -> Result<Vec<f64>>;

    /// Drive distances in kilometers between each consecutive pair.
    fn leg_distances(&self, coords: &[Coord]) -> Result<Vec<f64>>;

    /// Route geometry for each consecutive pair, one polyline per pair.
    fn route_geometries(&self, coords: &[Coord]) -> Result<Vec<Polyline>>;

    /// Point at `distance_km` traveled along `route`. Returns the last
    /// point when the distance exceeds the route's length.
    fn interpolate(&self, route: &Polyline, distance_km: f64) -> Result<Coord> {
        route
            .point_at_km(distance_km)
            .ok_or_else(|| Error::InvalidInput("cannot interpolate along an empty polyline".into()))
    }

    /// Best-effort "City, State" name for a coordinate.
    ///
    /// Implementations must return a placeholder such as
    /// `"Unknown Location"` on failure; this call never aborts a
    /// simulation.
    fn reverse_geocode(&self, lat: f64, lon: f64) -> String;
}
