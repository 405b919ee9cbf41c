//! HTTP geo adapter: OSRM for routing, Nominatim for geocoding.

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::polyline::Polyline;
use crate::traits::{Coord, GeoService};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub osrm_url: String,
    pub nominatim_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Sent on every request; Nominatim's usage policy requires one.
    pub user_agent: String,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            osrm_url: "http://localhost:5000".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
            user_agent: "hos-planner/0.2".to_string(),
        }
    }
}

impl OsrmConfig {
    /// Default config with `OSRM_URL` / `NOMINATIM_URL` overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("OSRM_URL") {
            config.osrm_url = url;
        }
        if let Ok(url) = std::env::var("NOMINATIM_URL") {
            config.nominatim_url = url;
        }
        config
    }
}

/// Blocking HTTP client implementing [`GeoService`].
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    fn geocode(&self, address: &str) -> Result<Coord> {
        let url = format!("{}/search", self.config.nominatim_url);
        let places: Vec<NominatimPlace> = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .json()?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidAddress(address.to_string()))?;
        let lon: f64 = place.lon.parse().map_err(|_| bad_coord(address))?;
        let lat: f64 = place.lat.parse().map_err(|_| bad_coord(address))?;
        debug!(%address, lon, lat, "geocoded");
        Ok((lon, lat))
    }

    /// One multi-point route request; OSRM reports one leg per
    /// consecutive coordinate pair.
    fn route_legs(&self, coords: &[Coord]) -> Result<Vec<OsrmLeg>> {
        let response: OsrmRouteResponse = self
            .client
            .get(self.route_url(coords))
            .query(&[("overview", "false")])
            .send()?
            .error_for_status()?
            .json()?;

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| Error::GeoService("OSRM returned no route".to_string()))?;
        Ok(route.legs)
    }

    fn route_url(&self, coords: &[Coord]) -> String {
        let pairs = coords
            .iter()
            .map(|(lon, lat)| format!("{:.6},{:.6}", lon, lat))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/route/v1/{}/{}",
            self.config.osrm_url, self.config.profile, pairs
        )
    }
}

impl GeoService for OsrmClient {
    fn resolve(&self, addresses: &[&str]) -> Result<Vec<Coord>> {
        // Independent lookups; par_iter keeps the input order on collect.
        addresses
            .par_iter()
            .map(|address| self.geocode(address))
            .collect()
    }

    fn leg_durations(&self, coords: &[Coord]) -> Result<Vec<f64>> {
        let legs = self.route_legs(coords)?;
        Ok(legs.iter().map(|leg| leg.duration / 3600.0).collect())
    }

    fn leg_distances(&self, coords: &[Coord]) -> Result<Vec<f64>> {
        let legs = self.route_legs(coords)?;
        Ok(legs.iter().map(|leg| leg.distance / 1000.0).collect())
    }

    fn route_geometries(&self, coords: &[Coord]) -> Result<Vec<Polyline>> {
        coords
            .windows(2)
            .map(|pair| {
                let response: OsrmRouteResponse = self
                    .client
                    .get(self.route_url(pair))
                    .query(&[("overview", "full"), ("geometries", "geojson")])
                    .send()?
                    .error_for_status()?
                    .json()?;

                let geometry = response
                    .routes
                    .into_iter()
                    .next()
                    .and_then(|route| route.geometry)
                    .ok_or_else(|| Error::GeoService("OSRM returned no geometry".to_string()))?;
                Ok(Polyline::new(geometry.coordinates))
            })
            .collect()
    }

    fn reverse_geocode(&self, lat: f64, lon: f64) -> String {
        let url = format!("{}/reverse", self.config.nominatim_url);
        let response = self
            .client
            .get(url)
            .query(&[
                ("lat", format!("{lat:.6}")),
                ("lon", format!("{lon:.6}")),
                ("format", "jsonv2".to_string()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<NominatimReverse>());

        match response {
            Ok(body) => body.place_name().unwrap_or_else(unknown_location),
            Err(err) => {
                warn!(lat, lon, %err, "reverse geocode failed");
                unknown_location()
            }
        }
    }
}

fn bad_coord(address: &str) -> Error {
    Error::GeoService(format!("unparseable coordinates for '{address}'"))
}

fn unknown_location() -> String {
    "Unknown Location".to_string()
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    county: Option<String>,
    state: Option<String>,
}

impl NominatimReverse {
    /// "City, State" from the richest locality field available.
    fn place_name(&self) -> Option<String> {
        let address = self.address.as_ref()?;
        let locality = address
            .city
            .as_ref()
            .or(address.town.as_ref())
            .or(address.village.as_ref())
            .or(address.hamlet.as_ref())
            .or(address.county.as_ref())?;
        let state = address.state.as_ref()?;
        Some(format!("{locality}, {state}"))
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    legs: Vec<OsrmLeg>,
    #[serde(default)]
    geometry: Option<OsrmGeometry>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    /// Seconds.
    duration: f64,
    /// Meters.
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<Coord>,
}
