//! FlightCheck - flight-path weather safety analysis
//!
//! This library samples a route between two locations into waypoints,
//! fetches current weather for each waypoint concurrently, classifies the
//! waypoints against fixed safety thresholds and suggests an emergency
//! landing airport when conditions turn unsafe mid-route.

pub mod airports;
pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod geocode;
pub mod models;
pub mod route;
pub mod safety;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use airports::AirportIndex;
pub use analysis::{RouteAnalysis, RouteAnalyzer, Waypoint, WaypointReport};
pub use config::FlightCheckConfig;
pub use error::FlightCheckError;
pub use geocode::Geocoder;
pub use models::{AirportRecord, Coordinate, WeatherObservation, WeatherSample};
pub use safety::SafetyVerdict;
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
