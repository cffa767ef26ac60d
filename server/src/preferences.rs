//! Server-side key-value store for diff viewer preferences.
//!
//! Values are kept per profile so several dashboard users can share one
//! server. Each profile sees a plain [`PreferenceStore`]. The store lives in
//! memory only and holds at most `max_profiles` profiles.

use std::collections::HashMap;
use std::sync::Arc;

use cockpit_engine::PreferenceStore;
use dashmap::DashMap;

/// Profiles kept when no limit is configured.
pub const DEFAULT_MAX_PROFILES: usize = 1024;

/// Preference registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("Preference registry is full ({limit} profiles)")]
    RegistryFull { limit: usize },
}

/// Preferences of all profiles, one string map per profile.
///
/// Thread-safe and can be shared across handlers via `Arc`.
#[derive(Debug)]
pub struct PreferenceRegistry {
    profiles: DashMap<String, HashMap<String, String>>,
    max_profiles: usize,
}

impl Default for PreferenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceRegistry {
    /// Create an empty registry with the default profile limit.
    pub fn new() -> Self {
        Self::with_max_profiles(DEFAULT_MAX_PROFILES)
    }

    /// Create an empty registry holding at most `max_profiles` profiles.
    pub fn with_max_profiles(max_profiles: usize) -> Self {
        Self {
            profiles: DashMap::new(),
            max_profiles,
        }
    }

    /// Create an empty registry wrapped in Arc for sharing.
    pub fn new_shared(max_profiles: usize) -> Arc<Self> {
        Arc::new(Self::with_max_profiles(max_profiles))
    }

    /// Reserve room for `profile` before writing to it.
    ///
    /// Known profiles are always admitted. New ones only while the registry
    /// is below its limit.
    pub fn admit(&self, profile: &str) -> Result<(), PreferenceError> {
        if self.profiles.contains_key(profile) {
            return Ok(());
        }
        if self.profiles.len() >= self.max_profiles {
            tracing::warn!(profile, limit = self.max_profiles, "Preference registry full");
            return Err(PreferenceError::RegistryFull {
                limit: self.max_profiles,
            });
        }
        self.profiles.entry(profile.to_string()).or_default();
        Ok(())
    }

    /// The store view for one profile.
    pub fn scope<'a>(&'a self, profile: &'a str) -> ProfileStore<'a> {
        ProfileStore {
            registry: self,
            profile,
        }
    }

    /// Number of profiles holding preferences.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn max_profiles(&self) -> usize {
        self.max_profiles
    }
}

/// One profile's slice of the registry.
pub struct ProfileStore<'a> {
    registry: &'a PreferenceRegistry,
    profile: &'a str,
}

impl PreferenceStore for ProfileStore<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.registry
            .profiles
            .get(self.profile)
            .and_then(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) {
        tracing::debug!(profile = %self.profile, key, "Preference stored");
        self.registry
            .profiles
            .entry(self.profile.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}
