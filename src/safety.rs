//! Waypoint safety classification
//!
//! Applies fixed thresholds to each waypoint's weather observation. The
//! thresholds and the 233..=900 condition-code window come from the original
//! safety rules and are kept verbatim; they are placeholders, not validated
//! meteorological criteria.

use serde::{Deserialize, Serialize};

use crate::models::{WeatherObservation, WeatherSample};

/// Coldest temperature still considered safe, in Celsius.
pub const MIN_SAFE_TEMPERATURE_C: f32 = -10.0;
/// Hottest temperature still considered safe, in Celsius.
pub const MAX_SAFE_TEMPERATURE_C: f32 = 50.0;
/// Strongest wind still considered safe, in m/s.
pub const MAX_SAFE_WIND_SPEED_MS: f32 = 15.0;
/// Inclusive lower bound of the safe condition-code window.
pub const MIN_SAFE_CONDITION_CODE: u16 = 233;
/// Inclusive upper bound of the safe condition-code window.
pub const MAX_SAFE_CONDITION_CODE: u16 = 900;

/// Per-waypoint safety verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyVerdict {
    /// Conditions within all thresholds
    Safe,
    /// At least one threshold exceeded
    Unsafe,
    /// Weather could not be fetched for this waypoint
    DataUnavailable,
}

impl std::fmt::Display for SafetyVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SafetyVerdict::Safe => write!(f, "Safe to continue"),
            SafetyVerdict::Unsafe => write!(f, "Unsafe to continue"),
            SafetyVerdict::DataUnavailable => write!(f, "Data unavailable"),
        }
    }
}

/// Whether a single weather sample is within every safety threshold.
#[must_use]
pub fn is_sample_safe(sample: &WeatherSample) -> bool {
    sample.temperature_c >= MIN_SAFE_TEMPERATURE_C
        && sample.temperature_c <= MAX_SAFE_TEMPERATURE_C
        && sample.wind_speed_ms <= MAX_SAFE_WIND_SPEED_MS
        && sample.condition_code >= MIN_SAFE_CONDITION_CODE
        && sample.condition_code <= MAX_SAFE_CONDITION_CODE
}

/// Classify every observation and locate the first unsafe waypoint.
///
/// The verdict sequence is index-aligned with `observations`. Waypoints
/// without data become [`SafetyVerdict::DataUnavailable`]; they never count
/// as unsafe and are skipped when searching for the first unsafe index.
#[must_use]
pub fn classify(observations: &[WeatherObservation]) -> (Vec<SafetyVerdict>, Option<usize>) {
    let mut verdicts = Vec::with_capacity(observations.len());
    let mut first_unsafe = None;

    for (index, observation) in observations.iter().enumerate() {
        let verdict = match observation {
            WeatherObservation::Unavailable { .. } => SafetyVerdict::DataUnavailable,
            WeatherObservation::Observed(sample) => {
                if is_sample_safe(sample) {
                    SafetyVerdict::Safe
                } else {
                    SafetyVerdict::Unsafe
                }
            }
        };

        if verdict == SafetyVerdict::Unsafe && first_unsafe.is_none() {
            first_unsafe = Some(index);
        }
        verdicts.push(verdict);
    }

    (verdicts, first_unsafe)
}
