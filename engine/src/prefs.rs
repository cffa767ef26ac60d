//! Diff viewer preferences and the key-value store they persist to.
//!
//! Values are stored as plain strings under fixed keys so any string store
//! (browser storage, a server-side map) can back them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

pub const MIN_FONT_SIZE: u8 = 8;
pub const MAX_FONT_SIZE: u8 = 20;
pub const DEFAULT_FONT_SIZE: u8 = 12;

pub const FONT_SIZE_KEY: &str = "diff-viewer-font-size";
pub const HIDE_UNCHANGED_KEY: &str = "diff-viewer-hide-unchanged";

/// String key-value persistence for preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// In-memory [`PreferenceStore`].
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
    }
}

/// View settings of the side-by-side diff viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPreferences {
    pub font_size: u8,
    pub hide_unchanged: bool,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            hide_unchanged: false,
        }
    }
}

impl ViewPreferences {
    /// Read from a store, falling back to defaults for absent or unparsable values.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let font_size = store
            .get(FONT_SIZE_KEY)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(clamp_font_size)
            .unwrap_or(DEFAULT_FONT_SIZE);

        let hide_unchanged = store
            .get(HIDE_UNCHANGED_KEY)
            .and_then(|v| v.trim().parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            font_size,
            hide_unchanged,
        }
    }

    pub fn save(&self, store: &dyn PreferenceStore) {
        store.set(FONT_SIZE_KEY, self.font_size.to_string());
        store.set(HIDE_UNCHANGED_KEY, self.hide_unchanged.to_string());
    }

    pub fn set_font_size(&mut self, size: i64) {
        self.font_size = clamp_font_size(size);
    }

    pub fn increase_font(&mut self) -> u8 {
        self.set_font_size(i64::from(self.font_size) + 1);
        self.font_size
    }

    pub fn decrease_font(&mut self) -> u8 {
        self.set_font_size(i64::from(self.font_size) - 1);
        self.font_size
    }

    pub fn toggle_hide_unchanged(&mut self) -> bool {
        self.hide_unchanged = !self.hide_unchanged;
        self.hide_unchanged
    }
}

fn clamp_font_size(size: i64) -> u8 {
    // Bounds fit in u8, so the cast after clamping is lossless
    size.clamp(i64::from(MIN_FONT_SIZE), i64::from(MAX_FONT_SIZE)) as u8
}
