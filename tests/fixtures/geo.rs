//! Deterministic in-memory geo service.

use std::sync::atomic::{AtomicUsize, Ordering};

use hos_planner::error::{Error, Result};
use hos_planner::polyline::Polyline;
use hos_planner::traits::{Coord, GeoService};

/// Canned geo answers plus per-capability call counters.
///
/// `resolve` returns the configured coordinates in order, `leg_durations`
/// and `leg_distances` return the configured per-pair values, and route
/// geometries are straight lines between consecutive stops. Reverse
/// geocoding always answers with `place_name`.
pub struct FakeGeo {
    pub coords: Vec<Coord>,
    pub durations_hours: Vec<f64>,
    pub distances_km: Vec<f64>,
    pub place_name: String,
    /// Addresses that fail to resolve with `InvalidAddress`.
    pub unresolvable: Vec<String>,

    pub resolve_calls: AtomicUsize,
    pub duration_calls: AtomicUsize,
    pub distance_calls: AtomicUsize,
    pub geometry_calls: AtomicUsize,
    pub reverse_calls: AtomicUsize,
}

impl FakeGeo {
    pub fn new(coords: Vec<Coord>, durations_hours: Vec<f64>, distances_km: Vec<f64>) -> Self {
        Self {
            coords,
            durations_hours,
            distances_km,
            place_name: "Effingham, Illinois".to_string(),
            unresolvable: Vec::new(),
            resolve_calls: AtomicUsize::new(0),
            duration_calls: AtomicUsize::new(0),
            distance_calls: AtomicUsize::new(0),
            geometry_calls: AtomicUsize::new(0),
            reverse_calls: AtomicUsize::new(0),
        }
    }

    /// Minimal fake for simulator-only tests, which use interpolation and
    /// reverse geocoding but never resolve or route.
    pub fn minimal() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }
}

impl GeoService for FakeGeo {
    fn resolve(&self, addresses: &[&str]) -> Result<Vec<Coord>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(bad) = addresses
            .iter()
            .find(|a| self.unresolvable.iter().any(|u| u == *a))
        {
            return Err(Error::InvalidAddress(bad.to_string()));
        }
        assert_eq!(addresses.len(), self.coords.len(), "fixture coords mismatch");
        Ok(self.coords.clone())
    }

    fn leg_durations(&self, _coords: &[Coord]) -> Result<Vec<f64>> {
        self.duration_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.durations_hours.clone())
    }

    fn leg_distances(&self, _coords: &[Coord]) -> Result<Vec<f64>> {
        self.distance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.distances_km.clone())
    }

    fn route_geometries(&self, coords: &[Coord]) -> Result<Vec<Polyline>> {
        self.geometry_calls.fetch_add(1, Ordering::SeqCst);
        Ok(coords
            .windows(2)
            .map(|pair| Polyline::new(vec![pair[0], pair[1]]))
            .collect())
    }

    fn reverse_geocode(&self, _lat: f64, _lon: f64) -> String {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        self.place_name.clone()
    }
}
