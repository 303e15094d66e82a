//! Weather observation models

use serde::{Deserialize, Serialize};

/// Current weather readings at a single point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Temperature in Celsius
    pub temperature_c: f32,
    /// Wind speed in m/s
    pub wind_speed_ms: f32,
    /// Provider-specific numeric weather condition code
    pub condition_code: u16,
    /// Human-readable description of weather conditions
    pub description: String,
}

/// Outcome of one waypoint's weather fetch.
///
/// Failure is carried as data rather than an error so that one waypoint's
/// outage never aborts its siblings; the aggregate route result is always
/// fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherObservation {
    /// Fetch succeeded
    Observed(WeatherSample),
    /// Fetch failed after any retries; `reason` is diagnostic only
    Unavailable { reason: String },
}

impl WeatherObservation {
    /// The sample, if this observation succeeded.
    #[must_use]
    pub fn sample(&self) -> Option<&WeatherSample> {
        match self {
            WeatherObservation::Observed(sample) => Some(sample),
            WeatherObservation::Unavailable { .. } => None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, WeatherObservation::Observed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_accessor() {
        let observed = WeatherObservation::Observed(WeatherSample {
            temperature_c: 12.5,
            wind_speed_ms: 3.0,
            condition_code: 800,
            description: "clear sky".to_string(),
        });
        assert!(observed.is_available());
        assert_eq!(observed.sample().unwrap().condition_code, 800);

        let failed = WeatherObservation::Unavailable {
            reason: "timeout".to_string(),
        };
        assert!(!failed.is_available());
        assert!(failed.sample().is_none());
    }
}
