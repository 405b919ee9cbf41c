//! Map-marker aggregation: groups remark events into named buckets.

use serde::Serialize;

use crate::simulator::{Remark, REFILL_LABEL, REST_LABEL};
use crate::traits::Coord;

/// A single map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub name: String,
    pub coords: Coord,
}

/// Marker buckets for map display: the three trip inputs, duty-limit
/// rests, and fuel refills.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestStops {
    pub inputs: Vec<Waypoint>,
    pub duty_limit: Vec<Waypoint>,
    pub refill: Vec<Waypoint>,
}

/// The trip's three resolved input coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripCoords {
    pub current: Coord,
    pub pickup: Coord,
    pub dropoff: Coord,
}

/// Builds the marker buckets from the resolved inputs and the full remark
/// list. Remarks without a coordinate are skipped.
pub fn aggregate(coords: &TripCoords, remarks: &[Remark]) -> RestStops {
    let inputs = vec![
        Waypoint {
            name: "🚚 Current Location".to_string(),
            coords: coords.current,
        },
        Waypoint {
            name: "📦 Pickup Location".to_string(),
            coords: coords.pickup,
        },
        Waypoint {
            name: "🏁 Dropoff Location".to_string(),
            coords: coords.dropoff,
        },
    ];

    RestStops {
        inputs,
        duty_limit: collect(remarks, REST_LABEL),
        refill: collect(remarks, REFILL_LABEL),
    }
}

fn collect(remarks: &[Remark], label: &str) -> Vec<Waypoint> {
    remarks
        .iter()
        .filter(|r| r.information == label)
        .filter_map(|r| {
            r.coords.map(|coords| Waypoint {
                name: r.location.clone(),
                coords,
            })
        })
        .collect()
}
