//! Cockpit Compare Server - HTTP access to the compare engine.
//!
//! The dashboard posts two attribute sets, a pre-computed diff or raw CSV
//! text and gets the engine's derived result back as JSON. Diff viewer
//! preferences are kept per profile in memory.

pub mod config;
pub mod error;
pub mod handlers;
pub mod preferences;
mod routes;

use crate::config::Config;
use crate::preferences::PreferenceRegistry;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub preferences: Arc<PreferenceRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            preferences: PreferenceRegistry::new_shared(config.max_profiles),
            config: Arc::new(config),
        }
    }
}

/// Build the application router with all layers applied.
pub fn build_app(state: AppState) -> Router {
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    let app = if state.config.cors_allow_any {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    };

    app.with_state(state)
}
