//! Board-wide settings.
//!
//! Settings arrive as JSON from the settings store and are validated once at
//! start-up. Missing keys take their defaults.

use crate::task::domain::Board;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;
use thiserror::Error;

/// Allowed range for the background refresh interval, in seconds.
pub const REFRESH_INTERVAL_RANGE: RangeInclusive<u64> = 10..=20;

/// Board-wide settings.
///
/// # Examples
///
/// ```
/// use storeboard::config::BoardConfig;
///
/// let config = BoardConfig::from_json_str(r#"{ "allowTaskDeletion": false }"#)?;
/// assert!(!config.allow_task_deletion);
/// assert_eq!(config.refresh_interval_secs, 15);
/// # Ok::<(), storeboard::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Board shown to users that have not picked one.
    pub default_board: Board,
    /// Whether managers may delete completed tasks.
    pub allow_task_deletion: bool,
    /// Seconds between background refreshes.
    pub refresh_interval_secs: u64,
    /// Days before a deadline at which a task counts as due soon.
    pub deadline_warning_days: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_board: Board::Voorwinkel,
            allow_task_deletion: true,
            refresh_interval_secs: 15,
            deadline_warning_days: 3,
        }
    }
}

impl BoardConfig {
    /// Parses and validates settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidJson`] when the input does not decode
    /// and [`ConfigError::RefreshIntervalOutOfRange`] when validation fails.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RefreshIntervalOutOfRange`] when the refresh
    /// interval lies outside [`REFRESH_INTERVAL_RANGE`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !REFRESH_INTERVAL_RANGE.contains(&self.refresh_interval_secs) {
            return Err(ConfigError::RefreshIntervalOutOfRange(
                self.refresh_interval_secs,
            ));
        }
        Ok(())
    }

    /// Returns the refresh interval as a [`Duration`].
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings document is not valid JSON for [`BoardConfig`].
    #[error("invalid board settings: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The refresh interval is outside the supported range.
    #[error("refresh interval of {0}s is outside 10..=20 seconds")]
    RefreshIntervalOutOfRange(u64),
}
