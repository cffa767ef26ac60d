//! Liveness and build information.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine_version: &'static str,
    /// Profiles currently held by the preference registry
    pub preference_profiles: usize,
    pub max_preference_profiles: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine_version: cockpit_engine::VERSION,
        preference_profiles: state.preferences.len(),
        max_preference_profiles: state.preferences.max_profiles(),
    })
}

async fn root() -> &'static str {
    "Cockpit Compare Server"
}
