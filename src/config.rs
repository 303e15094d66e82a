//! Configuration management for the FlightCheck application
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::FlightCheckError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the FlightCheck application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightCheckConfig {
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Airport reference dataset configuration
    pub airports: AirportsConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Route analysis defaults
    pub route: RouteConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeather API key, required for both weather and geocoding
    pub api_key: Option<String>,
    /// Base URL for the current-weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Base URL for the direct-geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures (attempts = retries + 1)
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
}

/// Airport reference dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportsConfig {
    /// Path to the airports CSV file
    #[serde(default = "default_airports_path")]
    pub dataset_path: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Route analysis defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Number of waypoints sampled per route, including both endpoints
    #[serde(default = "default_waypoint_count")]
    pub waypoint_count: usize,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_weather_timeout() -> u32 {
    8
}

fn default_weather_max_retries() -> u32 {
    2
}

fn default_airports_path() -> String {
    "data/airports.csv".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_waypoint_count() -> usize {
    6
}

impl Default for FlightCheckConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig {
                api_key: None,
                base_url: default_weather_base_url(),
                geocoding_base_url: default_geocoding_base_url(),
                timeout_seconds: default_weather_timeout(),
                max_retries: default_weather_max_retries(),
            },
            airports: AirportsConfig {
                dataset_path: default_airports_path(),
            },
            server: ServerConfig {
                port: default_server_port(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
            route: RouteConfig {
                waypoint_count: default_waypoint_count(),
            },
        }
    }
}

impl FlightCheckConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. FLIGHTCHECK_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("FLIGHTCHECK")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: FlightCheckConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flightcheck").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if let Some(api_key) = &self.weather.api_key {
            if api_key.is_empty() {
                return Err(FlightCheckError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(
                FlightCheckError::config("Weather API timeout must be between 1 and 300 seconds")
                    .into(),
            );
        }

        if self.weather.max_retries > 10 {
            return Err(
                FlightCheckError::config("Weather API max retries cannot exceed 10").into(),
            );
        }

        if self.route.waypoint_count < 2 {
            return Err(FlightCheckError::config(
                "Route waypoint count must be at least 2 (departure and arrival)",
            )
            .into());
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(FlightCheckError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for url in [&self.weather.base_url, &self.weather.geocoding_base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FlightCheckError::config(
                    "Weather API base URLs must be valid HTTP or HTTPS URLs",
                )
                .into());
            }
        }

        Ok(())
    }

    /// The API key, or a configuration error if it is absent
    pub fn require_api_key(&self) -> Result<&str> {
        self.weather
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                FlightCheckError::config(
                    "Weather API key is missing. Set FLIGHTCHECK_WEATHER__API_KEY or add it to config.toml.",
                )
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FlightCheckConfig::default();
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.weather.timeout_seconds, 8);
        assert_eq!(config.route.waypoint_count, 6);
        assert_eq!(config.server.port, 8000);
        assert!(config.weather.api_key.is_none());
    }

    #[test]
    fn test_require_api_key_missing() {
        let config = FlightCheckConfig::default();
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_require_api_key_present() {
        let mut config = FlightCheckConfig::default();
        config.weather.api_key = Some("valid_api_key_123".to_string());
        assert_eq!(config.require_api_key().unwrap(), "valid_api_key_123");
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = FlightCheckConfig::default();
        config.weather.timeout_seconds = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[test]
    fn test_validation_rejects_single_waypoint() {
        let mut config = FlightCheckConfig::default();
        config.route.waypoint_count = 1;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("waypoint count"));
    }

    #[test]
    fn test_validation_rejects_invalid_log_level() {
        let mut config = FlightCheckConfig::default();
        config.logging.level = "noisy".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let mut config = FlightCheckConfig::default();
        config.weather.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
