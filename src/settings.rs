//! Simulation settings and tuning
//!
//! Read from a JSON file named by `METEOR_MADNESS_SETTINGS`. Missing fields
//! take their defaults, so a file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Environment variable holding the settings file path
pub const SETTINGS_ENV: &str = "METEOR_MADNESS_SETTINGS";

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Arcade RNG seed (random per run when absent)
    pub seed: Option<u64>,

    // === Timing ===
    /// Explorer explosion flash length (seconds)
    pub explosion_duration: f32,
    /// Seconds between arcade meteor spawns
    pub spawn_interval: f32,

    // === Accessibility ===
    /// Stop the planet from spinning
    pub reduced_motion: bool,

    // === Demo / headless ===
    /// Ticks the autopilot waits between clicks
    pub autopilot_cooldown_ticks: u32,
    /// Emit a snapshot every N ticks
    pub snapshot_every: u32,
    /// Stop a headless run after this many seconds
    pub max_session_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            explosion_duration: EXPLOSION_DURATION,
            spawn_interval: SPAWN_INTERVAL,

            reduced_motion: false,

            autopilot_cooldown_ticks: 20,
            snapshot_every: 6,
            max_session_secs: 60.0,
        }
    }
}

impl Settings {
    /// Degrees per tick the target body turns
    pub fn body_rotation_per_tick(&self) -> f32 {
        if self.reduced_motion {
            0.0
        } else {
            BODY_ROTATION_PER_TICK
        }
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Load from the file named by `METEOR_MADNESS_SETTINGS`, else defaults
    pub fn load() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from_path(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Could not load settings from {}: {} (using defaults)", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "reduced_motion": true }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert!(settings.reduced_motion);
        assert_eq!(settings.spawn_interval, SPAWN_INTERVAL);
        assert_eq!(settings.body_rotation_per_tick(), 0.0);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: Some(99),
            spawn_interval: 1.0,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load_from_path("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
