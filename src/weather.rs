//! Weather retrieval for route waypoints
//!
//! Wraps the OpenWeather current-weather API behind the [`WeatherProvider`]
//! trait and fans a route's waypoints out into bounded concurrent fetches.
//! A failed waypoint is recorded in its own result slot and never aborts the
//! sibling fetches, so the classifier always sees a fully populated,
//! index-aligned observation sequence.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::WeatherConfig;
use crate::models::{Coordinate, WeatherObservation, WeatherSample};

/// Upper bound on in-flight weather requests per route.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

/// Initial backoff for retried transient failures.
const RETRY_MIN_BACKOFF: Duration = Duration::from_millis(300);
/// Backoff ceiling for retried transient failures.
const RETRY_MAX_BACKOFF: Duration = Duration::from_secs(4);
/// How much of an error response body to keep for diagnostics.
const ERROR_BODY_LIMIT: usize = 120;

/// Source of current weather for a single point.
///
/// This is the seam to the external weather collaborator; tests inject
/// scripted implementations for fault injection.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current weather at `point`.
    ///
    /// Implementations handle their own timeout and retry policy; an error
    /// here means the point's data is unavailable, not that the route
    /// analysis failed.
    async fn current_weather(&self, point: Coordinate) -> Result<WeatherSample>;
}

/// Fetch current weather for every waypoint concurrently.
///
/// The output has the same length as `points` and slot `i` always corresponds
/// to `points[i]`, regardless of the completion order of the underlying
/// requests. Concurrency is capped at [`MAX_CONCURRENT_FETCHES`].
pub async fn fetch_route_weather<P>(provider: &P, points: &[Coordinate]) -> Vec<WeatherObservation>
where
    P: WeatherProvider + ?Sized,
{
    if points.is_empty() {
        return Vec::new();
    }

    let limit = points.len().min(MAX_CONCURRENT_FETCHES);
    debug!(
        "Fetching weather for {} waypoints ({} concurrent)",
        points.len(),
        limit
    );

    stream::iter(points.iter().copied().enumerate())
        .map(|(index, point)| async move {
            match provider.current_weather(point).await {
                Ok(sample) => WeatherObservation::Observed(sample),
                Err(error) => {
                    warn!("Weather fetch failed for waypoint {index} at {point}: {error:#}");
                    WeatherObservation::Unavailable {
                        reason: format!("{error:#}"),
                    }
                }
            }
        })
        .buffered(limit)
        .collect()
        .await
}

/// OpenWeather API client with per-request timeout and bounded retries.
///
/// Transient failures (connection errors, HTTP 429 and 5xx) are retried with
/// exponential backoff by the retry middleware; any other non-2xx status is
/// an immediate failure carrying the status and a truncated body.
pub struct OpenWeatherClient {
    pub(crate) http: ClientWithMiddleware,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) geocoding_base_url: String,
}

impl OpenWeatherClient {
    /// Build a client from the weather configuration section.
    pub fn new(config: &WeatherConfig, api_key: String) -> Result<Self> {
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(RETRY_MIN_BACKOFF, RETRY_MAX_BACKOFF)
            .build_with_max_retries(config.max_retries);

        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("flightcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let http = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            geocoding_base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, point: Coordinate) -> Result<WeatherSample> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, point.latitude, point.longitude, self.api_key
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("weather request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("http {}: {}", status.as_u16(), truncate(&body, ERROR_BODY_LIMIT));
        }

        let payload: openweather::CurrentWeatherResponse = response
            .json()
            .await
            .context("failed to parse OpenWeather current weather response")?;

        let condition = payload
            .weather
            .first()
            .ok_or_else(|| anyhow!("weather payload has no condition entry"))?;

        Ok(WeatherSample {
            temperature_c: payload.main.temp,
            wind_speed_ms: payload.wind.speed,
            condition_code: condition.id,
            description: condition.description.clone(),
        })
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}

/// OpenWeather API response structures
pub(crate) mod openweather {
    use serde::Deserialize;

    /// Current weather response, reduced to the fields we consume
    #[derive(Debug, Deserialize)]
    pub struct CurrentWeatherResponse {
        pub main: MainData,
        pub wind: WindData,
        #[serde(default)]
        pub weather: Vec<ConditionData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        /// Temperature in Celsius (`units=metric`)
        pub temp: f32,
    }

    #[derive(Debug, Deserialize)]
    pub struct WindData {
        /// Wind speed in m/s (`units=metric`)
        pub speed: f32,
    }

    #[derive(Debug, Deserialize)]
    pub struct ConditionData {
        /// Numeric weather condition code
        pub id: u16,
        pub description: String,
    }

    /// One entry of the direct-geocoding response
    #[derive(Debug, Deserialize)]
    pub struct GeocodingEntry {
        pub lat: f64,
        pub lon: f64,
    }
}
