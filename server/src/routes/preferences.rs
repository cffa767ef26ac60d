//! Preference endpoint routes.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::handlers::{
    handle_font_step, handle_get_preferences, handle_update_preferences, FontStep,
    UpdatePreferences,
};
use crate::AppState;
use cockpit_engine::ViewPreferences;

/// Create preference routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/preferences/{profile}",
            get(get_handler).put(update_handler),
        )
        .route("/preferences/{profile}/font/increase", post(increase_handler))
        .route("/preferences/{profile}/font/decrease", post(decrease_handler))
}

/// GET /preferences/{profile} - Current view preferences.
async fn get_handler(
    State(state): State<AppState>,
    Path(profile): Path<String>,
) -> Result<Json<ViewPreferences>> {
    let prefs = handle_get_preferences(&state.preferences, &profile)?;
    Ok(Json(prefs))
}

/// PUT /preferences/{profile} - Partial update.
async fn update_handler(
    State(state): State<AppState>,
    Path(profile): Path<String>,
    Json(update): Json<UpdatePreferences>,
) -> Result<Json<ViewPreferences>> {
    let prefs = handle_update_preferences(&state.preferences, &profile, update)?;
    Ok(Json(prefs))
}

/// POST /preferences/{profile}/font/increase
async fn increase_handler(
    State(state): State<AppState>,
    Path(profile): Path<String>,
) -> Result<Json<ViewPreferences>> {
    let prefs = handle_font_step(&state.preferences, &profile, FontStep::Increase)?;
    Ok(Json(prefs))
}

/// POST /preferences/{profile}/font/decrease
async fn decrease_handler(
    State(state): State<AppState>,
    Path(profile): Path<String>,
) -> Result<Json<ViewPreferences>> {
    let prefs = handle_font_step(&state.preferences, &profile, FontStep::Decrease)?;
    Ok(Json(prefs))
}
