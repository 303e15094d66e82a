//! Route safety analysis
//!
//! Composes the route sampler, airport index, weather fetcher and safety
//! classifier into the final per-route verdict, including the alert decision
//! and the emergency-landing suggestion. Stateless per invocation; all
//! collaborators are injected.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::airports::AirportIndex;
use crate::error::FlightCheckError;
use crate::geocode::Geocoder;
use crate::models::{AirportRecord, Coordinate, WeatherObservation};
use crate::route;
use crate::safety::{self, SafetyVerdict};
use crate::weather::{self, WeatherProvider};

/// One sampled point along the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// 0-based position along the route
    pub index: usize,
    /// Sampled coordinates
    pub location: Coordinate,
    /// Label of the nearest reference airport ("city, country" style)
    pub nearest_label: String,
}

/// A waypoint together with its observation and verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointReport {
    pub waypoint: Waypoint,
    pub observation: WeatherObservation,
    pub verdict: SafetyVerdict,
}

/// Final artifact of a route analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteAnalysis {
    /// Departure location name as given by the caller
    pub departure: String,
    /// Arrival location name as given by the caller
    pub arrival: String,
    /// Human-readable overall recommendation
    pub alert: String,
    /// Per-waypoint reports, ordered departure to arrival
    pub waypoints: Vec<WaypointReport>,
    /// Suggested diversion airport, when a mid-route waypoint is unsafe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_airport: Option<AirportRecord>,
    /// When this analysis was generated
    pub generated_at: DateTime<Utc>,
}

/// Service composing the route safety pipeline.
pub struct RouteAnalyzer<'a> {
    airports: &'a AirportIndex,
    geocoder: &'a dyn Geocoder,
    weather: &'a dyn WeatherProvider,
    waypoint_count: usize,
}

impl<'a> RouteAnalyzer<'a> {
    /// Create an analyzer with the default waypoint count.
    #[must_use]
    pub fn new(
        airports: &'a AirportIndex,
        geocoder: &'a dyn Geocoder,
        weather: &'a dyn WeatherProvider,
    ) -> Self {
        Self {
            airports,
            geocoder,
            weather,
            waypoint_count: route::DEFAULT_WAYPOINT_COUNT,
        }
    }

    /// Override the number of sampled waypoints (minimum 2).
    #[must_use]
    pub fn with_waypoint_count(mut self, count: usize) -> Self {
        self.waypoint_count = count.max(2);
        self
    }

    /// Analyze the route between two named locations.
    ///
    /// Fails only for whole-analysis-invalidating conditions: blank input or
    /// an endpoint that cannot be geocoded. Per-waypoint weather failures are
    /// reported inside the result, never as an error.
    pub async fn analyze(&self, departure: &str, arrival: &str) -> Result<RouteAnalysis> {
        let departure = departure.trim();
        let arrival = arrival.trim();
        if departure.is_empty() || arrival.is_empty() {
            return Err(FlightCheckError::validation(
                "departure and arrival names must not be empty",
            )
            .into());
        }

        info!("Analyzing route from {departure} to {arrival}");

        let departure_point = self.resolve_endpoint(departure).await?;
        let arrival_point = self.resolve_endpoint(arrival).await?;

        let points = route::sample(departure_point, arrival_point, self.waypoint_count);

        let waypoints: Vec<Waypoint> = points
            .iter()
            .enumerate()
            .map(|(index, &location)| Waypoint {
                index,
                location,
                nearest_label: self.airports.nearest(location).label(),
            })
            .collect();

        let observations = weather::fetch_route_weather(self.weather, &points).await;
        let (verdicts, first_unsafe) = safety::classify(&observations);
        debug!("Verdicts: {verdicts:?}, first unsafe: {first_unsafe:?}");

        let (alert, emergency_airport) =
            self.decide(departure, &points, &verdicts, first_unsafe);

        let waypoints = waypoints
            .into_iter()
            .zip(observations)
            .zip(verdicts)
            .map(|((waypoint, observation), verdict)| WaypointReport {
                waypoint,
                observation,
                verdict,
            })
            .collect();

        Ok(RouteAnalysis {
            departure: departure.to_string(),
            arrival: arrival.to_string(),
            alert,
            waypoints,
            emergency_airport,
            generated_at: Utc::now(),
        })
    }

    async fn resolve_endpoint(&self, name: &str) -> Result<Coordinate> {
        self.geocoder
            .resolve(name)
            .await?
            .ok_or_else(|| FlightCheckError::geocoding(name).into())
    }

    /// The alert decision ladder.
    ///
    /// Unsafe conditions at the first two waypoints block departure outright;
    /// there is no meaningful diversion point before the route has begun. An
    /// unsafe waypoint further out anchors the diversion at the waypoint just
    /// before it.
    fn decide(
        &self,
        departure: &str,
        points: &[Coordinate],
        verdicts: &[SafetyVerdict],
        first_unsafe: Option<usize>,
    ) -> (String, Option<AirportRecord>) {
        if verdicts.first() == Some(&SafetyVerdict::Unsafe) {
            return (
                format!("Delay departure at {departure}. First waypoint is unsafe."),
                None,
            );
        }

        if verdicts.get(1) == Some(&SafetyVerdict::Unsafe) {
            return (
                format!("Delay departure at {departure}. Second waypoint is unsafe."),
                None,
            );
        }

        if let Some(unsafe_index) = first_unsafe {
            // The first two indices were handled above, so unsafe_index > 1
            let last_good = points[unsafe_index - 1];
            let airport = self.airports.nearest(last_good).clone();
            let alert = format!(
                "Emergency landing recommended at {} ({}, {}).",
                airport.name, airport.city, airport.country
            );
            info!(
                "Unsafe waypoint {unsafe_index}; diversion anchored at waypoint {}",
                unsafe_index - 1
            );
            return (alert, Some(airport));
        }

        ("All clear on current check.".to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AirportRecord, WeatherSample};
    use anyhow::bail;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubGeocoder {
        known: HashMap<String, Coordinate>,
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn resolve(&self, name: &str) -> Result<Option<Coordinate>> {
            Ok(self.known.get(name).copied())
        }
    }

    /// Weather stub keyed by latitude rounded to one decimal place.
    struct StubWeather {
        temps: HashMap<i64, f32>,
        fail_all: bool,
    }

    fn lat_key(latitude: f64) -> i64 {
        (latitude * 10.0).round() as i64
    }

    #[async_trait]
    impl WeatherProvider for StubWeather {
        async fn current_weather(&self, point: Coordinate) -> Result<WeatherSample> {
            if self.fail_all {
                bail!("injected outage");
            }
            let temperature_c = self
                .temps
                .get(&lat_key(point.latitude))
                .copied()
                .unwrap_or(20.0);
            Ok(WeatherSample {
                temperature_c,
                wind_speed_ms: 5.0,
                condition_code: 800,
                description: "clear sky".to_string(),
            })
        }
    }

    fn airport(name: &str, city: &str, lat: f64, lon: f64) -> AirportRecord {
        AirportRecord {
            name: name.to_string(),
            city: city.to_string(),
            country: "US".to_string(),
            location: Coordinate::new(lat, lon),
        }
    }

    fn fixture() -> (AirportIndex, StubGeocoder) {
        // Alpha sits on waypoint 2 of the test route; Omega is far away
        let airports = AirportIndex::new(vec![
            airport("Alpha Field", "Alphaville", 40.4, -74.4),
            airport("Omega Intl", "Omegatown", 48.0, -60.0),
        ])
        .unwrap();

        let geocoder = StubGeocoder {
            known: HashMap::from([
                ("Departure City".to_string(), Coordinate::new(40.0, -74.0)),
                ("Arrival City".to_string(), Coordinate::new(41.0, -75.0)),
            ]),
        };

        (airports, geocoder)
    }

    /// Route latitudes are 40.0, 40.2, ... 41.0; set one waypoint's
    /// temperature by its index.
    fn weather_with_unsafe_at(indices: &[usize]) -> StubWeather {
        let mut temps = HashMap::new();
        for &index in indices {
            temps.insert(400 + (index as i64) * 2, 60.0);
        }
        StubWeather {
            temps,
            fail_all: false,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_emergency_landing() {
        let (airports, geocoder) = fixture();
        let weather = weather_with_unsafe_at(&[3]);
        let analyzer = RouteAnalyzer::new(&airports, &geocoder, &weather);

        let analysis = analyzer
            .analyze("Departure City", "Arrival City")
            .await
            .unwrap();

        assert_eq!(analysis.waypoints.len(), 6);
        let verdicts: Vec<SafetyVerdict> =
            analysis.waypoints.iter().map(|w| w.verdict).collect();
        assert_eq!(
            verdicts,
            vec![
                SafetyVerdict::Safe,
                SafetyVerdict::Safe,
                SafetyVerdict::Safe,
                SafetyVerdict::Unsafe,
                SafetyVerdict::Safe,
                SafetyVerdict::Safe,
            ]
        );

        // Diversion is anchored at waypoint 2 (40.4, -74.4), where Alpha sits
        assert!(analysis.alert.contains("Emergency landing recommended"));
        assert!(analysis.alert.contains("Alpha Field"));
        let emergency = analysis.emergency_airport.unwrap();
        assert_eq!(emergency.name, "Alpha Field");
    }

    #[tokio::test]
    async fn test_first_waypoint_unsafe_blocks_departure() {
        let (airports, geocoder) = fixture();
        // Other waypoints unsafe too; the first-waypoint rule wins
        let weather = weather_with_unsafe_at(&[0, 3]);
        let analyzer = RouteAnalyzer::new(&airports, &geocoder, &weather);

        let analysis = analyzer
            .analyze("Departure City", "Arrival City")
            .await
            .unwrap();

        assert!(analysis.alert.contains("First waypoint is unsafe"));
        assert!(analysis.emergency_airport.is_none());
    }

    #[tokio::test]
    async fn test_second_waypoint_unsafe_blocks_departure() {
        let (airports, geocoder) = fixture();
        let weather = weather_with_unsafe_at(&[1]);
        let analyzer = RouteAnalyzer::new(&airports, &geocoder, &weather);

        let analysis = analyzer
            .analyze("Departure City", "Arrival City")
            .await
            .unwrap();

        assert!(analysis.alert.contains("Second waypoint is unsafe"));
        assert!(analysis.emergency_airport.is_none());
    }

    #[tokio::test]
    async fn test_all_clear_route() {
        let (airports, geocoder) = fixture();
        let weather = weather_with_unsafe_at(&[]);
        let analyzer = RouteAnalyzer::new(&airports, &geocoder, &weather);

        let analysis = analyzer
            .analyze("Departure City", "Arrival City")
            .await
            .unwrap();

        assert_eq!(analysis.alert, "All clear on current check.");
        assert!(analysis.emergency_airport.is_none());
        assert!(
            analysis
                .waypoints
                .iter()
                .all(|w| w.verdict == SafetyVerdict::Safe)
        );
    }

    #[tokio::test]
    async fn test_total_weather_outage_degrades_to_all_clear() {
        let (airports, geocoder) = fixture();
        let weather = StubWeather {
            temps: HashMap::new(),
            fail_all: true,
        };
        let analyzer = RouteAnalyzer::new(&airports, &geocoder, &weather);

        let analysis = analyzer
            .analyze("Departure City", "Arrival City")
            .await
            .unwrap();

        // Unavailable data never triggers the emergency logic
        assert_eq!(analysis.alert, "All clear on current check.");
        assert!(analysis.emergency_airport.is_none());
        assert!(
            analysis
                .waypoints
                .iter()
                .all(|w| w.verdict == SafetyVerdict::DataUnavailable)
        );
    }

    #[tokio::test]
    async fn test_unresolvable_location_fails_the_analysis() {
        let (airports, geocoder) = fixture();
        let weather = weather_with_unsafe_at(&[]);
        let analyzer = RouteAnalyzer::new(&airports, &geocoder, &weather);

        let err = analyzer
            .analyze("Nowhere Land", "Arrival City")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Nowhere Land"));
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let (airports, geocoder) = fixture();
        let weather = weather_with_unsafe_at(&[]);
        let analyzer = RouteAnalyzer::new(&airports, &geocoder, &weather);

        assert!(analyzer.analyze("  ", "Arrival City").await.is_err());
    }

    #[tokio::test]
    async fn test_waypoints_carry_nearest_labels() {
        let (airports, geocoder) = fixture();
        let weather = weather_with_unsafe_at(&[]);
        let analyzer = RouteAnalyzer::new(&airports, &geocoder, &weather);

        let analysis = analyzer
            .analyze("Departure City", "Arrival City")
            .await
            .unwrap();

        // Every waypoint on this short route is closest to Alpha
        for report in &analysis.waypoints {
            assert_eq!(report.waypoint.nearest_label, "Alphaville, US");
        }
        assert_eq!(analysis.waypoints[2].waypoint.index, 2);
    }
}
