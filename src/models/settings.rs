//! User settings persisted as TOML.

use crate::models::engine::{DEFAULT_PRE_ROLL_MS, DEFAULT_SCROLL_SPEED};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_PATH: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsState {
    pub chart_path: PathBuf,
    pub audio_path: PathBuf,
    /// Key names per lane, in lane order (e.g. `KeyD`).
    pub keybinds: Vec<String>,
    /// Pixels per second.
    pub scroll_speed: f32,
    pub pre_roll_ms: f64,
    pub master_volume: f32, // 0.0 to 1.0
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            chart_path: PathBuf::from("songs/tutorial/chart.json"),
            audio_path: PathBuf::from("songs/tutorial/audio.wav"),
            keybinds: ["KeyD", "KeyF", "KeyJ", "KeyK"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scroll_speed: DEFAULT_SCROLL_SPEED,
            pre_roll_ms: DEFAULT_PRE_ROLL_MS,
            master_volume: 0.5,
            window_width: 800,
            window_height: 720,
        }
    }
}

impl SettingsState {
    /// Loads `settings.toml` from the working directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_PATH))
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("SETTINGS: Cannot read {:?} ({}), using defaults", path, e);
                return Self::default();
            }
        };

        match Self::from_toml(&content) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("SETTINGS: Failed to parse {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(content)?;
        settings.sanitize();
        Ok(settings)
    }

    fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        if !self.scroll_speed.is_finite() || self.scroll_speed <= 0.0 {
            self.scroll_speed = DEFAULT_SCROLL_SPEED;
        }
        if !self.pre_roll_ms.is_finite() || self.pre_roll_ms < 0.0 {
            self.pre_roll_ms = DEFAULT_PRE_ROLL_MS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings = SettingsState::from_toml("master_volume = 0.8\n").unwrap();
        assert_eq!(settings.master_volume, 0.8);
        assert_eq!(settings.keybinds, vec!["KeyD", "KeyF", "KeyJ", "KeyK"]);
        assert_eq!(settings.pre_roll_ms, 100.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let settings =
            SettingsState::from_toml("master_volume = 3.0\nscroll_speed = -1.0\n").unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.scroll_speed, DEFAULT_SCROLL_SPEED);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = SettingsState::load_from(Path::new("does/not/exist.toml"));
        assert_eq!(settings, SettingsState::default());
    }
}
