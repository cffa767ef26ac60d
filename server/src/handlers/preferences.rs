//! Preference handlers - diff viewer settings per profile.

use crate::error::{AppError, Result};
use crate::preferences::PreferenceRegistry;
use cockpit_engine::ViewPreferences;
use serde::Deserialize;

/// Partial update of view preferences.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferences {
    /// Clamped into the supported range
    pub font_size: Option<i64>,
    pub hide_unchanged: Option<bool>,
}

/// Font size step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStep {
    Increase,
    Decrease,
}

/// Load a profile's preferences, defaults for unknown profiles.
pub fn handle_get_preferences(
    registry: &PreferenceRegistry,
    profile: &str,
) -> Result<ViewPreferences> {
    validate_profile(profile)?;
    Ok(ViewPreferences::load(&registry.scope(profile)))
}

/// Apply a partial update and persist the result.
pub fn handle_update_preferences(
    registry: &PreferenceRegistry,
    profile: &str,
    update: UpdatePreferences,
) -> Result<ViewPreferences> {
    validate_profile(profile)?;
    registry.admit(profile)?;
    let store = registry.scope(profile);
    let mut prefs = ViewPreferences::load(&store);

    if let Some(size) = update.font_size {
        prefs.set_font_size(size);
    }
    if let Some(hide) = update.hide_unchanged {
        prefs.hide_unchanged = hide;
    }

    prefs.save(&store);
    Ok(prefs)
}

/// Step the font size by one, clamped, and persist it.
pub fn handle_font_step(
    registry: &PreferenceRegistry,
    profile: &str,
    step: FontStep,
) -> Result<ViewPreferences> {
    validate_profile(profile)?;
    registry.admit(profile)?;
    let store = registry.scope(profile);
    let mut prefs = ViewPreferences::load(&store);

    match step {
        FontStep::Increase => prefs.increase_font(),
        FontStep::Decrease => prefs.decrease_font(),
    };

    prefs.save(&store);
    Ok(prefs)
}

/// Profile names are non-blank and never contain ':'.
fn validate_profile(profile: &str) -> Result<()> {
    if profile.trim().is_empty() {
        return Err(AppError::BadRequest("profile must not be empty".to_string()));
    }
    if profile.contains(':') {
        return Err(AppError::BadRequest(
            "profile must not contain ':'".to_string(),
        ));
    }
    Ok(())
}
