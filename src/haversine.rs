//! Great-circle distance between coordinates.
//!
//! Used for walking route polylines by traveled distance. Less accurate
//! than road distance but the error over a single polyline segment is
//! negligible.

use crate::traits::Coord;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two (lon, lat) coordinates.
pub fn haversine_km(from: Coord, to: Coord) -> f64 {
    let (lng1, lat1) = from;
    let (lng2, lat2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}
