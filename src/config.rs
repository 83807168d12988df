//! Engine configuration parsing and validation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::models::recommendation::RiskLevel;
use crate::{AppError, Result};

/// Per-risk approval timeouts in minutes.
///
/// `critical` defaults shorter than `high`: critical items are urgent, not
/// lenient, and should escalate fast.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutConfig {
    /// Timeout for low-risk requests.
    #[serde(default = "default_low_minutes")]
    pub low_minutes: u64,
    /// Timeout for medium-risk requests.
    #[serde(default = "default_medium_minutes")]
    pub medium_minutes: u64,
    /// Timeout for high-risk requests.
    #[serde(default = "default_high_minutes")]
    pub high_minutes: u64,
    /// Timeout for critical-risk requests.
    #[serde(default = "default_critical_minutes")]
    pub critical_minutes: u64,
}

fn default_low_minutes() -> u64 {
    30
}

fn default_medium_minutes() -> u64 {
    120
}

fn default_high_minutes() -> u64 {
    480
}

fn default_critical_minutes() -> u64 {
    60
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            low_minutes: default_low_minutes(),
            medium_minutes: default_medium_minutes(),
            high_minutes: default_high_minutes(),
            critical_minutes: default_critical_minutes(),
        }
    }
}

impl TimeoutConfig {
    /// Timeout duration for the given risk level.
    #[must_use]
    pub fn for_risk(&self, risk: RiskLevel) -> Duration {
        let minutes = match risk {
            RiskLevel::Low => self.low_minutes,
            RiskLevel::Medium => self.medium_minutes,
            RiskLevel::High => self.high_minutes,
            RiskLevel::Critical => self.critical_minutes,
        };
        Duration::from_secs(minutes * 60)
    }
}

/// Business-hours window inside which auto-approval is permitted.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BusinessHoursConfig {
    /// First eligible local hour (inclusive, 24h clock).
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    /// First ineligible local hour (exclusive, 24h clock).
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
}

fn default_start_hour() -> u32 {
    9
}

fn default_end_hour() -> u32 {
    18
}

impl Default for BusinessHoursConfig {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
        }
    }
}

fn default_history_capacity() -> usize {
    256
}

/// Engine configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Per-risk approval timeouts.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Auto-approval business-hours window.
    #[serde(default)]
    pub business_hours: BusinessHoursConfig,
    /// Maximum resolution records retained in the in-memory history.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeouts: TimeoutConfig::default(),
            business_hours: BusinessHoursConfig::default(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read, contains
    /// invalid TOML, or fails validation.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(AppError::Config(
                "history_capacity must be greater than zero".into(),
            ));
        }

        let hours = &self.business_hours;
        if hours.start_hour >= hours.end_hour || hours.end_hour > 24 {
            return Err(AppError::Config(format!(
                "business_hours window {}..{} is invalid",
                hours.start_hour, hours.end_hour
            )));
        }

        for (name, minutes) in [
            ("low", self.timeouts.low_minutes),
            ("medium", self.timeouts.medium_minutes),
            ("high", self.timeouts.high_minutes),
            ("critical", self.timeouts.critical_minutes),
        ] {
            if minutes == 0 {
                return Err(AppError::Config(format!(
                    "timeouts.{name}_minutes must be greater than zero"
                )));
            }
        }

        Ok(())
    }
}
