//! Configuration management for the server.

use std::env;

use crate::preferences::DEFAULT_MAX_PROFILES;

/// Default request body cap: 2 MiB.
const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Largest accepted request body (diffs and CSV uploads can be big)
    pub max_body_bytes: usize,
    /// Allow cross-origin requests from any origin (dashboard dev server)
    pub cors_allow_any: bool,
    /// Most preference profiles kept in memory
    pub max_profiles: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cors_allow_any: true,
            max_profiles: DEFAULT_MAX_PROFILES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidPort)?,
            None => defaults.port,
        };

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(value) => value
                .trim()
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .ok_or(ConfigError::InvalidMaxBodyBytes)?,
            None => defaults.max_body_bytes,
        };

        let cors_allow_any = match lookup("CORS_ALLOW_ANY") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidCorsFlag)?,
            None => defaults.cors_allow_any,
        };

        let max_profiles = match lookup("MAX_PROFILES") {
            Some(value) => value
                .trim()
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .ok_or(ConfigError::InvalidMaxProfiles)?,
            None => defaults.max_profiles,
        };

        Ok(Self {
            host,
            port,
            max_body_bytes,
            cors_allow_any,
            max_profiles,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("MAX_BODY_BYTES must be a positive integer")]
    InvalidMaxBodyBytes,

    #[error("CORS_ALLOW_ANY must be a boolean flag")]
    InvalidCorsFlag,

    #[error("MAX_PROFILES must be a positive integer")]
    InvalidMaxProfiles,
}
