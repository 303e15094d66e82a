//! Airport reference record model

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

/// One row of the static airport reference table.
///
/// Loaded once at startup and read-only for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    /// Airport name
    pub name: String,
    /// City the airport serves
    pub city: String,
    /// Country code or name as given by the dataset
    pub country: String,
    /// Airport location
    pub location: Coordinate,
}

impl AirportRecord {
    /// Human-readable label for the record.
    ///
    /// Prefers "city, country", then the city alone, then the airport name,
    /// falling back to "Unknown" when every field is blank.
    #[must_use]
    pub fn label(&self) -> String {
        let city = self.city.trim();
        let country = self.country.trim();
        let name = self.name.trim();

        if !city.is_empty() && !country.is_empty() {
            format!("{city}, {country}")
        } else if !city.is_empty() {
            city.to_string()
        } else if !name.is_empty() {
            name.to_string()
        } else {
            "Unknown".to_string()
        }
    }
}
