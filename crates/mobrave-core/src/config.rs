//! Page configuration: asset locations and tuning, overridable from the query string.

use crate::console::DEFAULT_CONSOLE_CAP;
use crate::sensors::{GeolocationSettings, DEFAULT_STEP_THRESHOLD};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub weights_url: String,
    pub patcher_url: String,
    pub midi_manifest_url: String,
    pub metrics_interval_ms: u32,
    pub step_threshold: f64,
    pub console_cap_bytes: usize,
    pub geolocation: GeolocationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            weights_url: "/v1_test_weights.bin".to_string(),
            patcher_url: "/patch.export.json".to_string(),
            midi_manifest_url: "/midi/manifest.json".to_string(),
            metrics_interval_ms: 33,
            step_threshold: DEFAULT_STEP_THRESHOLD,
            console_cap_bytes: DEFAULT_CONSOLE_CAP,
            geolocation: GeolocationSettings::default(),
        }
    }
}

impl AppConfig {
    /// Query-string keys understood by [`AppConfig::apply_override`].
    pub const OVERRIDE_KEYS: [&'static str; 5] =
        ["weights", "patcher", "midi", "metrics_ms", "step_threshold"];

    /// Apply one override. On error the previous value is kept.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "weights" | "patcher" | "midi" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(invalid());
                }
                let slot = match key {
                    "weights" => &mut self.weights_url,
                    "patcher" => &mut self.patcher_url,
                    _ => &mut self.midi_manifest_url,
                };
                *slot = value.to_string();
            }
            "metrics_ms" => {
                let ms: u32 = value.trim().parse().map_err(|_| invalid())?;
                if ms == 0 {
                    return Err(invalid());
                }
                self.metrics_interval_ms = ms;
            }
            "step_threshold" => {
                let t: f64 = value.trim().parse().map_err(|_| invalid())?;
                if !t.is_finite() || t <= 0.0 {
                    return Err(invalid());
                }
                self.step_threshold = t;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Apply every pair, logging and skipping the ones that fail.
    pub fn with_overrides<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (key, value) in pairs {
            match self.apply_override(key, value) {
                Ok(()) => log::info!("[config] {key} = {value}"),
                Err(e) => log::warn!("[config] {e}"),
            }
        }
        self
    }
}
