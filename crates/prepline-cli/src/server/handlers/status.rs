//! Welcome and health handlers.

use axum::Json;
use serde::Serialize;

/// Response for the root endpoint.
#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Response for the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Welcome message.
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the prepline API for data cleaning and preprocessing.".to_string(),
    })
}

/// Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
