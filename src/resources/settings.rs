//! Persisted player settings consulted by the time-scale controller.
//!
//! Loaded from an INI file. Provides defaults for safe startup and methods to
//! load/save the file.
//!
//! # Settings File Format
//!
//! ```ini
//! [time]
//! base_scale = 1.0
//!
//! [accessibility]
//! time_scale = 1.0
//! ```
//!
//! `time.base_scale` is the base time scale the controller starts from and
//! reverts to. `accessibility.time_scale` is the player's slow-down (or
//! speed-up) preference; it multiplies every non-paused effective scale and
//! may change at any moment, e.g. from an options menu.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;
use thiserror::Error;

/// Default safe values for startup
const DEFAULT_BASE_TIME_SCALE: f32 = 1.0;
const DEFAULT_ACCESSIBILITY_TIME_SCALE: f32 = 1.0;
const DEFAULT_SETTINGS_PATH: &str = "./settings.ini";

/// Errors raised while reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings file {path:?}: {message}")]
    Load { path: PathBuf, message: String },
    #[error("failed to save settings file {path:?}: {message}")]
    Save { path: PathBuf, message: String },
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Settings store resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameSettings {
    base_time_scale: f32,
    accessibility_time_scale: f32,
    /// Path to the settings file.
    pub settings_path: PathBuf,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSettings {
    /// Create settings with safe default values.
    pub fn new() -> Self {
        Self {
            base_time_scale: DEFAULT_BASE_TIME_SCALE,
            accessibility_time_scale: DEFAULT_ACCESSIBILITY_TIME_SCALE,
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
        }
    }

    /// Create settings with a custom file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: path.into(),
            ..Self::new()
        }
    }

    /// Base time scale to start from and revert to.
    pub fn base_time_scale(&self) -> f32 {
        self.base_time_scale
    }

    /// The player's accessibility time-scale multiplier.
    pub fn accessibility_time_scale(&self) -> f32 {
        self.accessibility_time_scale
    }

    /// Set the stored base time scale. Negative values clamp to zero, NaN is ignored.
    pub fn set_base_time_scale(&mut self, value: f32) {
        if !value.is_nan() {
            self.base_time_scale = value.max(0.0);
        }
    }

    /// Set the accessibility multiplier. Negative values clamp to zero, NaN is ignored.
    pub fn set_accessibility_time_scale(&mut self, value: f32) {
        if !value.is_nan() {
            self.accessibility_time_scale = value.max(0.0);
        }
    }

    /// Load settings from the INI file.
    ///
    /// Missing values retain their current (default) values. Unparseable
    /// values abort the load and leave every field untouched.
    pub fn load_from_file(&mut self) -> Result<(), SettingsError> {
        let mut ini = Ini::new();
        ini.load(&self.settings_path)
            .map_err(|message| SettingsError::Load {
                path: self.settings_path.clone(),
                message,
            })?;

        let base = read_scale(&ini, "time", "base_scale")?;
        let accessibility = read_scale(&ini, "accessibility", "time_scale")?;

        if let Some(base) = base {
            self.base_time_scale = base;
        }
        if let Some(accessibility) = accessibility {
            self.accessibility_time_scale = accessibility;
        }

        info!(
            "Loaded settings from {:?}: base_scale={}, accessibility={}",
            self.settings_path, self.base_time_scale, self.accessibility_time_scale
        );

        Ok(())
    }

    /// Save settings to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), SettingsError> {
        let mut ini = Ini::new();
        ini.set("time", "base_scale", Some(self.base_time_scale.to_string()));
        ini.set(
            "accessibility",
            "time_scale",
            Some(self.accessibility_time_scale.to_string()),
        );

        ini.write(&self.settings_path)
            .map_err(|e| SettingsError::Save {
                path: self.settings_path.clone(),
                message: e.to_string(),
            })?;

        info!("Saved settings to {:?}", self.settings_path);

        Ok(())
    }
}

/// Read a non-negative scale; `Ok(None)` when the key is absent.
fn read_scale(ini: &Ini, section: &str, key: &str) -> Result<Option<f32>, SettingsError> {
    let value = ini
        .getfloat(section, key)
        .map_err(|message| SettingsError::InvalidValue {
            key: format!("{section}.{key}"),
            message,
        })?;
    match value {
        Some(v) if v.is_nan() => Err(SettingsError::InvalidValue {
            key: format!("{section}.{key}"),
            message: "NaN is not a time scale".to_string(),
        }),
        Some(v) => Ok(Some((v as f32).max(0.0))),
        None => Ok(None),
    }
}

/// Accessibility multiplier with the 1.0 fallback used when no store exists.
pub fn accessibility_scale(settings: Option<&GameSettings>) -> f32 {
    settings.map_or(DEFAULT_ACCESSIBILITY_TIME_SCALE, |s| {
        s.accessibility_time_scale
    })
}

/// Base time scale with the 1.0 fallback used when no store exists.
pub fn default_base_scale(settings: Option<&GameSettings>) -> f32 {
    settings.map_or(DEFAULT_BASE_TIME_SCALE, |s| s.base_time_scale)
}
