//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blastrs/settings.toml (or platform equivalent),
//! including the single persisted high score.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Audio settings
    pub audio: AudioSettings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// Best score ever reached
    pub high_score: u64,
}

/// Audio settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Background music on/off
    pub music: bool,
    /// Music volume (0-100)
    pub music_volume: u32,
    /// SFX volume (0-100)
    pub sfx_volume: u32,
}

/// Gameplay settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Fixed block seed; every new game deals the same sequence when set
    pub seed: Option<u64>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music: true,
            music_volume: 15,
            sfx_volume: 50,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blastrs", "blastrs").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or create default
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings text, falling back to defaults when it is malformed
    pub fn parse(contents: &str) -> Self {
        toml::from_str(contents).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings: {}", e);
            Self::default()
        })
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };

        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        // Create directory if needed
        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        // Serialize and write
        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }
}

/// Storage for the single best score
pub trait HighScoreStore {
    fn get(&self) -> u64;
    fn set(&mut self, score: u64);
}

impl HighScoreStore for Settings {
    fn get(&self) -> u64 {
        self.high_score
    }

    fn set(&mut self, score: u64) {
        self.high_score = score;
    }
}

/// In-memory store that forgets on exit
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStore(pub u64);

impl HighScoreStore for MemoryStore {
    fn get(&self) -> u64 {
        self.0
    }

    fn set(&mut self, score: u64) {
        self.0 = score;
    }
}

/// Raise the stored best if `score` beats it. Returns true on a new best.
pub fn record_score(store: &mut dyn HighScoreStore, score: u64) -> bool {
    if score > store.get() {
        store.set(score);
        true
    } else {
        false
    }
}
