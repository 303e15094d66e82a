//! Error types and handling for the FlightCheck application

use thiserror::Error;

/// Main error type for the FlightCheck application
#[derive(Error, Debug)]
pub enum FlightCheckError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Airport reference dataset errors (fatal at startup)
    #[error("Airport dataset error: {message}")]
    Dataset { message: String },

    /// A location name that could not be resolved to coordinates
    #[error("Could not resolve location: {location}")]
    Geocoding { location: String },

    /// External API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl FlightCheckError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Create a new geocoding error
    pub fn geocoding<S: Into<String>>(location: S) -> Self {
        Self::Geocoding {
            location: location.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FlightCheckError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            FlightCheckError::Dataset { message } => {
                format!("Airport dataset could not be loaded: {message}")
            }
            FlightCheckError::Geocoding { location } => {
                format!("Could not fetch coordinates for \"{location}\". Check city/airport names.")
            }
            FlightCheckError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            FlightCheckError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            FlightCheckError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = FlightCheckError::config("missing API key");
        assert!(matches!(config_err, FlightCheckError::Config { .. }));

        let geo_err = FlightCheckError::geocoding("Nowhereville");
        assert!(matches!(geo_err, FlightCheckError::Geocoding { .. }));

        let api_err = FlightCheckError::api("connection failed");
        assert!(matches!(api_err, FlightCheckError::Api { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = FlightCheckError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let geo_err = FlightCheckError::geocoding("Atlantis");
        assert!(geo_err.user_message().contains("Atlantis"));

        let validation_err = FlightCheckError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FlightCheckError = io_err.into();
        assert!(matches!(err, FlightCheckError::Io { .. }));
    }
}
