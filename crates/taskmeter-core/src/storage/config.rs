//! TOML-based application configuration.
//!
//! Holds everything that is fixed for the lifetime of a session:
//! - The ordered task list (one timer per task)
//! - Countdown length and tick period
//! - Earnings rate per minute
//! - Currency display settings
//! - Projection input defaults
//!
//! Configuration is stored at `~/.config/taskmeter/config.toml`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::projection::ProjectionParams;

/// Longest countdown a timer may be configured with (one day).
pub const MAX_INITIAL_DURATION_SECS: u64 = 24 * 60 * 60;

/// Highest accepted earnings rate per minute.
pub const MAX_RATE_PER_MINUTE: u64 = 1_000_000_000;

/// One configured task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDef {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Countdown settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_initial_duration_secs")]
    pub initial_duration_secs: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Conversion of elapsed time into money.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsConfig {
    #[serde(default = "default_rate_per_minute")]
    pub rate_per_minute: Decimal,
}

/// How amounts are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_code")]
    pub code: String,
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
    #[serde(default)]
    pub fraction_digits: u32,
    #[serde(default = "default_true")]
    pub symbol_after: bool,
}

/// Initial values of the projection inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_years")]
    pub years: u32,
    #[serde(default = "default_daily_rate_pct")]
    pub daily_rate_pct: Decimal,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/taskmeter/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub earnings: EarningsConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default = "default_tasks")]
    pub tasks: Vec<TaskDef>,
}

// Default functions
fn default_initial_duration_secs() -> u64 {
    30 * 60
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_rate_per_minute() -> Decimal {
    Decimal::from(10_000)
}
fn default_symbol() -> String {
    "₫".into()
}
fn default_code() -> String {
    "VND".into()
}
fn default_thousands_separator() -> String {
    ".".into()
}
fn default_decimal_separator() -> String {
    ",".into()
}
fn default_true() -> bool {
    true
}
fn default_years() -> u32 {
    ProjectionParams::default().years
}
fn default_daily_rate_pct() -> Decimal {
    ProjectionParams::default().daily_rate_pct
}

fn default_tasks() -> Vec<TaskDef> {
    [
        (
            "Zalo Group Messaging",
            "Build an app for Zalo group messaging.",
        ),
        (
            "Zalo Software Integration",
            "Create an app using Zalo messaging software like Akbiz and Zinbox.",
        ),
        (
            "Message Effectiveness Analysis",
            "Develop an app to evaluate the effectiveness of Zalo messages.",
        ),
        (
            "Zalo Group Finder",
            "Design an app to find Zalo groups on social media platforms.",
        ),
        (
            "Competitor Message Analysis",
            "Build a tool to analyze competitors' Zalo messages for insights.",
        ),
        (
            "Zalo Account Creator",
            "Create an app to manage the creation of 19 Zalo nicks.",
        ),
    ]
    .into_iter()
    .zip(1..)
    .map(|((title, description), id)| TaskDef {
        id,
        title: title.into(),
        description: description.into(),
    })
    .collect()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            initial_duration_secs: default_initial_duration_secs(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for EarningsConfig {
    fn default() -> Self {
        Self {
            rate_per_minute: default_rate_per_minute(),
        }
    }
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            code: default_code(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
            fraction_digits: 0,
            symbol_after: true,
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            years: default_years(),
            daily_rate_pct: default_daily_rate_pct(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            earnings: EarningsConfig::default(),
            currency: CurrencyConfig::default(),
            projection: ProjectionConfig::default(),
            tasks: default_tasks(),
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
    ) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown().into());
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
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "writing default config");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
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

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config fails validation. `self` is left untouched
    /// on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Checks the invariants the session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tasks.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "tasks".into(),
                message: "at least one task is required".into(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.tasks.iter().find(|t| !seen.insert(t.id)) {
            return Err(ConfigError::InvalidValue {
                key: "tasks".into(),
                message: format!("duplicate task id {}", dup.id),
            });
        }
        if self.timer.initial_duration_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.initial_duration_secs".into(),
                message: "must be greater than zero".into(),
            });
        }
        if self.timer.initial_duration_secs > MAX_INITIAL_DURATION_SECS {
            return Err(ConfigError::InvalidValue {
                key: "timer.initial_duration_secs".into(),
                message: format!("must be at most {MAX_INITIAL_DURATION_SECS}"),
            });
        }
        if self.timer.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        if self.earnings.rate_per_minute.is_sign_negative() {
            return Err(ConfigError::InvalidValue {
                key: "earnings.rate_per_minute".into(),
                message: "must not be negative".into(),
            });
        }
        if self.earnings.rate_per_minute > Decimal::from(MAX_RATE_PER_MINUTE) {
            return Err(ConfigError::InvalidValue {
                key: "earnings.rate_per_minute".into(),
                message: format!("must be at most {MAX_RATE_PER_MINUTE}"),
            });
        }
        Ok(())
    }

    /// Projection inputs a new session starts with.
    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams::new(self.projection.years, self.projection.daily_rate_pct)
    }
}
