//! Data models for the FlightCheck application
//!
//! This module contains the core domain models organized by concern:
//! - Location: geographic coordinates
//! - Airport: static airport reference records
//! - Weather: per-waypoint weather observations

pub mod airport;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use airport::AirportRecord;
pub use location::Coordinate;
pub use weather::{WeatherObservation, WeatherSample};
