//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Brew timer behavior (grace period, tick interval)
//! - Allowed range for total brew time adjustments
//! - Assistant service endpoint, models and polling
//! - History size and the default bean profile
//!
//! Configuration is stored at `~/.config/barista/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::brew::{RescaleBounds, DEFAULT_GRACE_SECS};
use crate::error::ConfigError;
use crate::profile::CoffeeProfile;

/// Brew timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Seconds past the last step before the brew is declared finished.
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u32,
    /// Length of one timer second in milliseconds (live mode).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Generative assistant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_video_model")]
    pub video_model: String,
    #[serde(default = "default_video_resolution")]
    pub video_resolution: String,
    #[serde(default = "default_video_aspect_ratio")]
    pub video_aspect_ratio: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Brew history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/barista/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub rescale: RescaleBounds,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub profile: CoffeeProfile,
}

// Default functions
fn default_grace_secs() -> u32 {
    DEFAULT_GRACE_SECS
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_video_model() -> String {
    "veo-3.1-fast-generate-preview".into()
}
fn default_video_resolution() -> String {
    "720p".into()
}
fn default_video_aspect_ratio() -> String {
    "16:9".into()
}
fn default_poll_interval_secs() -> u64 {
    5
}
fn default_max_polls() -> u32 {
    120
}
fn default_request_timeout_secs() -> u64 {
    60
}
fn default_history_limit() -> usize {
    20
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            grace_secs: default_grace_secs(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            video_model: default_video_model(),
            video_resolution: default_video_resolution(),
            video_aspect_ratio: default_video_aspect_ratio(),
            poll_interval_secs: default_poll_interval_secs(),
            max_polls: default_max_polls(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_err = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        toml::from_str(&content).map_err(|e| load_err(e.to_string()))
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_err(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key (in memory; call `save` to persist).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.grace_secs, 5);
        assert_eq!(parsed.rescale.max_total_secs, 600);
        assert_eq!(parsed.profile.origin, "Ethiopia");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\ngrace_secs = 10\n").unwrap();
        assert_eq!(parsed.timer.grace_secs, 10);
        assert_eq!(parsed.timer.tick_interval_ms, 1000);
        assert_eq!(parsed.history.limit, 20);
        assert_eq!(parsed.assistant.model, "gemini-2.5-flash");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.grace_secs").as_deref(), Some("5"));
        assert_eq!(cfg.get("assistant.video_resolution").as_deref(), Some("720p"));
        assert_eq!(cfg.get("profile.roast_level").as_deref(), Some("Light"));
        assert!(cfg.get("timer.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("rescale.min_total_secs", "90").unwrap();
        assert_eq!(cfg.rescale.min_total_secs, 90);
    }

    #[test]
    fn set_updates_enum_and_string() {
        let mut cfg = Config::default();
        cfg.set("profile.roast_level", "Dark").unwrap();
        cfg.set("profile.origin", "Kenya").unwrap();
        assert_eq!(cfg.profile.roast_level, crate::profile::RoastLevel::Dark);
        assert_eq!(cfg.profile.origin, "Kenya");
    }

    #[test]
    fn set_accepts_json_for_lists() {
        let mut cfg = Config::default();
        cfg.set("profile.tasting_notes", r#"["Berry","Floral"]"#).unwrap();
        assert_eq!(cfg.profile.tasting_notes, vec!["Berry", "Floral"]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.grace_secs", "soon").is_err());
        assert!(cfg.set("profile.roast_level", "Charcoal").is_err());
        assert_eq!(cfg.timer.grace_secs, 5);
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.timer.grace_secs = 8;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer.grace_secs, 8);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
