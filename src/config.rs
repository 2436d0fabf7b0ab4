//! Session configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::types::UpdateRate;
use crate::{Result, TimingError};

/// Settings for one race session.
///
/// Every field has a default, so a YAML document only needs the keys it
/// changes:
///
/// ```rust
/// use regatta_clock::SessionConfig;
///
/// let config = SessionConfig::from_yaml("lap_limit: 8\n").unwrap();
/// assert_eq!(config.tick_hz, 10);
/// assert_eq!(config.lap_limit, Some(8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct SessionConfig {
    /// Clock display refresh rate.
    pub tick_hz: u32,

    /// Maximum splits per race, including the start marker. `None` records
    /// any number, leaving splits beyond the six lanes unassigned.
    pub lap_limit: Option<usize>,

    /// Default rate for display subscribers.
    pub display_rate: UpdateRate,
}

impl SessionConfig {
    pub const DEFAULT_TICK_HZ: u32 = 10;
    const MAX_TICK_HZ: u32 = 1000;

    /// Parse and validate a YAML configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TimingError::parse_error("session config", e))?;
        config.validate()?;
        debug!("Loaded session config: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=Self::MAX_TICK_HZ).contains(&self.tick_hz) {
            return Err(TimingError::parse_error(
                "session config",
                format!("tick_hz must be between 1 and {}, got {}", Self::MAX_TICK_HZ, self.tick_hz),
            ));
        }
        if self.lap_limit == Some(0) {
            return Err(TimingError::parse_error(
                "session config",
                "lap_limit must leave room for the start marker",
            ));
        }
        Ok(())
    }

    /// Period of the display tick.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz.max(1)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { tick_hz: Self::DEFAULT_TICK_HZ, lap_limit: None, display_rate: UpdateRate::Native }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.tick_hz, 10);
        assert_eq!(config.lap_limit, None);
        assert_eq!(config.display_rate, UpdateRate::Native);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(SessionConfig::from_yaml("{}").unwrap(), SessionConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = SessionConfig::from_yaml("tick_hz: 20\ndisplay_rate: Native\n").unwrap();
        assert_eq!(config.tick_hz, 20);
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
        assert_eq!(config.lap_limit, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for yaml in ["tick_hz: 0", "tick_hz: 5000", "lap_limit: 0", "tick_hz: fast"] {
            let err = SessionConfig::from_yaml(yaml).unwrap_err();
            assert!(matches!(err, TimingError::Parse { .. }), "{yaml}: {err:?}");
        }
    }
}
