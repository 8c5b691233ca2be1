//! Configuration management and environment variable loading

use crate::{KokoroError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Load environment variables from .env file
///
/// This function loads variables from a .env file in the current directory
/// or a parent directory. It's safe to call multiple times (only loads once).
///
/// # Example
///
/// ```no_run
/// use kokoro_core::load_env;
///
/// load_env().ok();
///
/// let sessions_dir = std::env::var("KOKORO_SESSIONS_DIR").unwrap_or_default();
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("✓ Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(KokoroError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::warn!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(KokoroError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Load environment variables from a specific file
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    match dotenvy::from_path(path.as_ref()) {
        Ok(_) => {
            tracing::info!("✓ Loaded environment from: {}", path.as_ref().display());
            Ok(())
        }
        Err(e) => Err(KokoroError::config(format!(
            "Failed to load {} environment file: {}",
            path.as_ref().display(),
            e
        ))),
    }
}

/// Get required environment variable
///
/// Returns an error if the variable is not set
pub fn get_required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| {
        KokoroError::config(format!(
            "Required environment variable '{}' is not set. \
             Check your .env file or system environment.",
            key
        ))
    })
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Get environment variable as float
pub fn get_env_float(key: &str, default: f32) -> f32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<f32>().ok())
        .unwrap_or(default)
}

/// Tunables for multi-turn pattern recognition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Minimum turns required before a pattern is recognized
    pub min_pattern_length: usize,
    /// Stability at or above which a pattern counts as consistent
    pub stability_threshold: f32,
    /// Upper bound on the strengthening factor
    pub max_strengthening_factor: f32,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_pattern_length: 3,
            stability_threshold: 0.7,
            max_strengthening_factor: 0.5,
        }
    }
}

/// Tunables for single-turn transition smoothing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmootherConfig {
    /// Shift magnitude above which a transition counts as dramatic
    pub dramatic_shift_threshold: f32,
    /// Hard cap on the smoothing factor so some movement always occurs
    pub max_smoothing_factor: f32,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            dramatic_shift_threshold: 0.6,
            max_smoothing_factor: 0.9,
        }
    }
}

/// Tunables for the affection state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectionConfig {
    /// Affection level assigned to a brand-new session
    pub initial_level: u8,
    /// Absolute delta above which the change is applied gradually
    pub gradual_change_threshold: i32,
    /// Magnitude of each scheduled increment
    pub gradual_step: i32,
    /// Seconds between successive scheduled increments
    pub gradual_step_spacing_secs: i64,
    /// Maximum sentiment records retained per session
    pub history_cap: usize,
}

impl Default for AffectionConfig {
    fn default() -> Self {
        Self {
            initial_level: 15,
            gradual_change_threshold: 5,
            gradual_step: 2,
            gradual_step_spacing_secs: 60,
            history_cap: 50,
        }
    }
}

/// Tunables for the session tracker service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Affection state machine settings
    pub affection: AffectionConfig,
    /// Maximum sessions kept resident in memory
    pub max_sessions: usize,
    /// Days after which an untouched session is eligible for cleanup
    pub retention_days: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            affection: AffectionConfig::default(),
            max_sessions: 1000,
            retention_days: 30,
        }
    }
}

impl TrackerConfig {
    /// Build a tracker config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.affection.initial_level = get_env_int("KOKORO_INITIAL_AFFECTION", 15u8).min(100);
        config.max_sessions = get_env_int("KOKORO_MAX_SESSIONS", 1000usize);
        config.retention_days = get_env_int("KOKORO_RETENTION_DAYS", 30i64);
        config
    }
}
