//! Location name resolution
//!
//! Resolves a user-supplied location name to coordinates through the
//! OpenWeather direct-geocoding API. Unlike waypoint weather, an
//! unresolvable endpoint invalidates the whole analysis, so the result
//! distinguishes "lookup failed" from "no such place".

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::debug;

use crate::models::Coordinate;
use crate::weather::{OpenWeatherClient, openweather};

/// Resolves location names to coordinates.
///
/// `Ok(None)` means the name matched nothing; errors are transport or
/// payload problems.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<Option<Coordinate>>;
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn resolve(&self, name: &str) -> Result<Option<Coordinate>> {
        debug!("Geocoding location name: {name}");

        let url = format!(
            "{}/direct?q={}&appid={}&limit=1",
            self.geocoding_base_url,
            urlencoding::encode(name),
            self.api_key
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("geocoding request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("geocoding returned http {}", status.as_u16());
        }

        let entries: Vec<openweather::GeocodingEntry> = response
            .json()
            .await
            .context("failed to parse OpenWeather geocoding response")?;

        Ok(entries
            .first()
            .map(|entry| Coordinate::new(entry.lat, entry.lon)))
    }
}
