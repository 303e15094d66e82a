//! HTTP API surface
//!
//! Thin request/response boundary over the route analyzer. All domain logic
//! lives in the core modules; handlers only decode input, run the analysis
//! and map errors to statuses.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::airports::AirportIndex;
use crate::analysis::{RouteAnalysis, RouteAnalyzer};
use crate::error::FlightCheckError;
use crate::geocode::Geocoder;
use crate::route::DEFAULT_WAYPOINT_COUNT;
use crate::weather::WeatherProvider;

/// Shared application state passed to all handlers.
///
/// Collaborators are injected once at startup; there is no hidden global
/// state and the airport index is read-only for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    pub airports: Arc<AirportIndex>,
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn WeatherProvider>,
    pub waypoint_count: usize,
}

impl AppState {
    #[must_use]
    pub fn new(
        airports: Arc<AirportIndex>,
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            airports,
            geocoder,
            weather,
            waypoint_count: DEFAULT_WAYPOINT_COUNT,
        }
    }

    #[must_use]
    pub fn with_waypoint_count(mut self, count: usize) -> Self {
        self.waypoint_count = count.max(2);
        self
    }
}

/// Request body for route analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub departure: String,
    pub arrival: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler error mapped onto an HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let status = match err.downcast_ref::<FlightCheckError>() {
            Some(FlightCheckError::Validation { .. } | FlightCheckError::Geocoding { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Some(FlightCheckError::Api { .. }) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Route analysis failed: {err:#}");
        }

        let message = match err.downcast_ref::<FlightCheckError>() {
            Some(known) => known.user_message(),
            None => "Route analysis failed.".to_string(),
        };

        Self { status, message }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<RouteAnalysis>, ApiError> {
    let analyzer = RouteAnalyzer::new(
        state.airports.as_ref(),
        state.geocoder.as_ref(),
        state.weather.as_ref(),
    )
    .with_waypoint_count(state.waypoint_count);

    let analysis = analyzer
        .analyze(&request.departure, &request.arrival)
        .await?;
    Ok(Json(analysis))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "airports": state.airports.len(),
    }))
}
