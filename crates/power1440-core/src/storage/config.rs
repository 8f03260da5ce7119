//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The allocation a fresh planner starts from
//! - Clock tick period
//! - Terminal UI behavior
//!
//! Configuration is stored at `~/.config/power1440/config.toml`. The plan
//! itself (budgets edited at runtime, tasks) is never written here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::allocation::Allocation;
use crate::error::{ConfigError, Result};

/// Starting budgets for a new planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    #[serde(default = "default_sleep")]
    pub sleep: u32,
    #[serde(default = "default_livelihood")]
    pub livelihood: u32,
    #[serde(default = "default_on_time")]
    pub on_time: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Seconds between countdown refreshes.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

/// Terminal UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long the event loop waits for a key before checking the clock.
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/power1440/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub allocation: AllocationConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_sleep() -> u32 {
    420
}
fn default_livelihood() -> u32 {
    600
}
fn default_on_time() -> u32 {
    420
}
fn default_tick_secs() -> u64 {
    60
}
fn default_poll_ms() -> u64 {
    250
}
fn default_true() -> bool {
    true
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            sleep: default_sleep(),
            livelihood: default_livelihood(),
            on_time: default_on_time(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_ms: default_poll_ms(),
            show_legend: true,
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
    ) -> std::result::Result<(), ConfigError> {
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
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
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

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// as the key's type.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Set a value by key and persist.
    ///
    /// # Errors
    ///
    /// See [`Config::set_value`] and [`Config::save`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Allocation a new planner starts with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the configured budgets do
    /// not sum to a full day.
    pub fn initial_allocation(&self) -> std::result::Result<Allocation, ConfigError> {
        let a = &self.allocation;
        Allocation::from_parts(a.sleep, a.livelihood, a.on_time).map_err(|e| {
            ConfigError::InvalidValue {
                key: "allocation".into(),
                message: e.to_string(),
            }
        })
    }

    /// Like [`Config::initial_allocation`], but falls back to the defaults.
    pub fn initial_allocation_or_default(&self) -> Allocation {
        self.initial_allocation().unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring configured allocation");
            Allocation::default()
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.clock.tick_secs.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.ui.poll_ms.max(10))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "using default configuration");
            Self::default()
        })
    }
}
