//! HTTP route definitions.

mod compare;
mod health;
mod preferences;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(compare::routes())
        .merge(preferences::routes())
}
