//! Player settings and preferences
//!
//! Persisted as JSON next to the game. A missing file is normal on first
//! launch and yields defaults; a corrupt one is reported and replaced by
//! defaults so the game still starts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::DEFAULT_MUSIC_VOLUME;
use crate::error::SettingsError;
use crate::platform::input::{BindingPreset, KeyBindings};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Controls ===
    pub bindings: BindingPreset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: DEFAULT_MUSIC_VOLUME,
            sfx_volume: 1.0,
            bindings: BindingPreset::Arrows,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn key_bindings(&self) -> KeyBindings {
        KeyBindings::preset(self.bindings)
    }

    /// Read settings from disk; an absent file means defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Like `load`, but any failure falls back to defaults with a warning
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            log::warn!("Ignoring settings at {}: {}", path.display(), err);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
