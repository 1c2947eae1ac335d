//! Game settings and tuning
//!
//! Loaded from an optional JSON file. Missing fields fall back to their
//! defaults, so a file only needs to name what it changes.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::rect::Rect;

/// Settings loading errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Spawn periods in frames (0 disables a spawner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSchedule {
    pub asteroid_every: u64,
    pub rocket_every: u64,
    pub nebula_every: u64,
    pub health_every: u64,
    /// Cooldown between player shots
    pub shot_every: u64,
}

impl Default for SpawnSchedule {
    fn default() -> Self {
        Self {
            asteroid_every: 10,
            rocket_every: 120,
            nebula_every: 600,
            health_every: 900,
            shot_every: 15,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; equal seeds and inputs replay identically
    pub seed: u64,

    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Player ===
    pub player_max_hp: i32,
    pub player_max_ammo: u32,
    /// Frames per regenerated round of ammo (0 = never)
    pub ammo_regen_every: u64,

    // === Hostiles ===
    pub spawn: SpawnSchedule,
    pub asteroid_hp: i32,
    pub rocket_hp: i32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 12345,

            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            player_max_hp: PLAYER_MAX_HP,
            player_max_ammo: PLAYER_MAX_AMMO,
            ammo_regen_every: 60,

            spawn: SpawnSchedule::default(),
            asteroid_hp: 10,
            rocket_hp: 2,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Playfield rectangle anchored at the origin
    pub fn playfield(&self) -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(self.playfield_width, self.playfield_height))
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Failed to load settings from {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let (w, h) = PLAYER_SIZE;
        if self.playfield_width < w || self.playfield_height < h {
            return Err(SettingsError::Invalid(format!(
                "playfield {}x{} is smaller than the player",
                self.playfield_width, self.playfield_height
            )));
        }
        if self.player_max_hp <= 0 {
            return Err(SettingsError::Invalid("player_max_hp must be positive".into()));
        }
        if self.asteroid_hp <= 0 || self.rocket_hp <= 0 {
            return Err(SettingsError::Invalid("hostile hp must be positive".into()));
        }
        for (name, vol) in [("master_volume", self.master_volume), ("sfx_volume", self.sfx_volume)] {
            if !(0.0..=1.0).contains(&vol) {
                return Err(SettingsError::Invalid(format!("{name} must be within 0.0-1.0")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.playfield().size, Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "spawn": { "rocket_every": 0 } }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.spawn.rocket_every, 0);
        assert_eq!(settings.spawn.asteroid_every, 10);
        assert_eq!(settings.player_max_hp, PLAYER_MAX_HP);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.muted = true;
        settings.asteroid_hp = 4;
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(Settings::from_json("{ nope"), Err(SettingsError::Parse(_))));
        assert!(matches!(
            Settings::from_json(r#"{ "player_max_hp": 0 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::load_from_file("/nonexistent/space-dodge.json"),
            Err(SettingsError::Io(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("space-dodge-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.seed = 99;
        settings.spawn.health_every = 300;

        settings.save(&path).unwrap();
        let loaded = Settings::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/space-dodge.json");
        assert_eq!(settings, Settings::default());
    }
}
