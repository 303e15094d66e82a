//! Airport reference index
//!
//! In-memory nearest-neighbor lookup over the static airport reference table.
//! The table is loaded once at startup, validated, and read-only afterwards,
//! so it is safe to share across concurrent waypoint tasks without locking.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

use crate::error::FlightCheckError;
use crate::models::{AirportRecord, Coordinate};

/// Column headers required in the airports CSV, after trimming and lowercasing.
const REQUIRED_COLUMNS: [&str; 5] = ["airport name", "city", "country", "latitude", "longitude"];

/// Great-circle distance between two points in kilometers.
#[must_use]
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        haversine::Location {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        haversine::Units::Kilometers,
    )
}

/// Nearest-airport lookup over the static reference set.
///
/// Lookup is a linear scan, which is fine at the current dataset scale
/// (hundreds to low thousands of rows). The scan is an implementation detail
/// of [`AirportIndex::nearest`], so a spatial index could replace it later
/// without changing callers.
#[derive(Debug, Clone)]
pub struct AirportIndex {
    airports: Vec<AirportRecord>,
}

impl AirportIndex {
    /// Build an index from a non-empty set of records.
    ///
    /// An empty set is a construction-time error: with at least one record,
    /// every subsequent lookup is total.
    pub fn new(airports: Vec<AirportRecord>) -> Result<Self> {
        if airports.is_empty() {
            return Err(FlightCheckError::dataset("airport reference set is empty").into());
        }
        Ok(Self { airports })
    }

    /// Load and validate the airports CSV file.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading airport reference data from {}", path.display());

        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            FlightCheckError::dataset(format!("failed to open {}: {e}", path.display()))
        })?;

        // Header names in the dataset vary in case and padding
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| FlightCheckError::dataset(format!("failed to read CSV header: {e}")))?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !headers.iter().any(|h| h == *required))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(FlightCheckError::dataset(format!(
                "airports CSV missing columns: {}",
                missing.join(", ")
            ))
            .into());
        }

        let column = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
        let name_idx = column("airport name");
        let city_idx = column("city");
        let country_idx = column("country");
        let lat_idx = column("latitude");
        let lon_idx = column("longitude");

        let mut airports = Vec::new();
        for (row_number, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                FlightCheckError::dataset(format!("failed to read CSV row {}: {e}", row_number + 2))
            })?;

            let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
            let parse_coord = |idx: usize, what: &str| -> Result<f64> {
                record
                    .get(idx)
                    .unwrap_or("")
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| {
                        FlightCheckError::dataset(format!(
                            "row {}: invalid {what} '{}'",
                            row_number + 2,
                            record.get(idx).unwrap_or("")
                        ))
                        .into()
                    })
            };

            airports.push(AirportRecord {
                name: field(name_idx),
                city: field(city_idx),
                country: field(country_idx),
                location: Coordinate::new(
                    parse_coord(lat_idx, "latitude")?,
                    parse_coord(lon_idx, "longitude")?,
                ),
            });
        }

        info!("Loaded {} airports from {}", airports.len(), path.display());
        Self::new(airports)
    }

    /// The record closest to `point` by great-circle distance.
    ///
    /// Ties keep the first record in load order, so results are deterministic
    /// for a fixed dataset.
    #[must_use]
    pub fn nearest(&self, point: Coordinate) -> &AirportRecord {
        // new() guarantees at least one record
        let mut best = &self.airports[0];
        let mut best_distance = distance_km(point, best.location);

        for airport in &self.airports[1..] {
            let distance = distance_km(point, airport.location);
            if distance < best_distance {
                best = airport;
                best_distance = distance;
            }
        }

        best
    }

    /// Number of records in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}
