//! Show settings
//!
//! Persisted as JSON: LocalStorage in the browser, a file natively.
//! Every field defaults to the stock show, so partial JSON is fine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Settings load/validation failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tunable show parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frames the launch counter must reach before an autonomous launch
    pub launch_interval: u32,
    /// Global hue at start (degrees)
    pub initial_hue: f32,
    /// Global hue advance per frame (degrees)
    pub hue_drift: f32,
    /// Opacity of the per-frame erase pass (higher = shorter afterglow)
    pub fade_alpha: f32,
    /// Stroke width of every trail segment
    pub line_width: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            launch_interval: LAUNCH_INTERVAL,
            initial_hue: INITIAL_HUE,
            hue_drift: HUE_DRIFT,
            fade_alpha: FADE_ALPHA,
            line_width: LINE_WIDTH,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the renderer/simulation can't use
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.initial_hue.is_finite() {
            return Err(SettingsError::Invalid {
                field: "initial_hue",
                reason: "must be finite",
            });
        }
        if !(self.hue_drift.is_finite() && self.hue_drift > 0.0) {
            return Err(SettingsError::Invalid {
                field: "hue_drift",
                reason: "must be positive (the hue only moves forward)",
            });
        }
        if !(0.0..=1.0).contains(&self.fade_alpha) {
            return Err(SettingsError::Invalid {
                field: "fade_alpha",
                reason: "must be within 0..=1",
            });
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(SettingsError::Invalid {
                field: "line_width",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tet_fireworks_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_show() {
        let s = Settings::default();
        assert_eq!(s.launch_interval, 40);
        assert_eq!(s.initial_hue, 120.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "line_width": 2.5 }"#).unwrap();
        assert_eq!(s.line_width, 2.5);
        assert_eq!(s.launch_interval, LAUNCH_INTERVAL);
        assert_eq!(s.fade_alpha, FADE_ALPHA);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{ "fade_alpha": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "fade_alpha",
                ..
            }
        ));

        for drift in ["0.0", "-0.2"] {
            let err = Settings::from_json(&format!(r#"{{ "hue_drift": {} }}"#, drift)).unwrap_err();
            assert!(matches!(err, SettingsError::Invalid { field: "hue_drift", .. }));
        }

        let err = Settings::from_json(r#"{ "line_width": -1.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "line_width", .. }));
    }

    #[test]
    fn test_burst_size_is_not_configurable() {
        // Older stored settings may still carry it; bursts stay at the stock size
        let s = Settings::from_json(r#"{ "burst_size": 7 }"#).unwrap();
        assert_eq!(s, Settings::default());
        assert!(!s.to_json().unwrap().contains("burst_size"));
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
