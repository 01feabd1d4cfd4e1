//! Tracing settings
//!
//! Only `sensitivity` changes scoring; the remaining flags are carried for the
//! renderer and audio collaborators.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sanitize::clamp_sensitivity;
use crate::types::{DEFAULT_SENSITIVITY, MAX_SENSITIVITY, MIN_SENSITIVITY};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("sensitivity {0} outside 1..=10")]
    SensitivityOutOfRange(u8),

    #[error("settings parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TracingSettings {
    pub sensitivity: u8,
    pub audio_enabled: bool,
    pub dot_guides_enabled: bool,
    pub high_contrast: bool,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            audio_enabled: true,
            dot_guides_enabled: true,
            high_contrast: false,
        }
    }
}

impl TracingSettings {
    pub fn new(sensitivity: u8) -> Result<Self, SettingsError> {
        if !(MIN_SENSITIVITY..=MAX_SENSITIVITY).contains(&sensitivity) {
            return Err(SettingsError::SensitivityOutOfRange(sensitivity));
        }
        Ok(Self {
            sensitivity,
            ..Self::default()
        })
    }

    /// Partial overrides on top of the defaults; sensitivity is clamped.
    ///
    /// Only a JSON object is accepted.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        if !value.is_object() {
            return Err(SettingsError::Parse("expected a JSON object".to_string()));
        }
        let mut settings: Self =
            serde_json::from_value(value).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.sensitivity = clamp_sensitivity(settings.sensitivity);
        Ok(settings)
    }

    /// Match radius: `(11 - sensitivity) * 2`
    pub fn tolerance(&self) -> f64 {
        f64::from(11 - clamp_sensitivity(self.sensitivity)) * 2.0
    }
}
