//! Test fixtures for hos-planner.
//!
//! Provides a deterministic, call-counting geo service so planner and
//! simulator behavior can be asserted without a network.

pub mod geo;

pub use geo::FakeGeo;
