//! Update rate control for clock display streams

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate at which a subscriber wants clock display updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// Every tick of the session clock (10Hz by default)
    #[default]
    Native,

    /// Throttled to at most this many updates per second.
    /// Rates at or above the tick rate collapse to Native.
    Max(u32),
}

impl UpdateRate {
    /// Normalize against the ticker frequency
    pub fn normalize(self, tick_hz: u32) -> Self {
        match self {
            UpdateRate::Max(hz) if hz == 0 || hz >= tick_hz => UpdateRate::Native,
            other => other,
        }
    }

    /// Throttle interval, `None` when every tick is delivered
    pub fn throttle_interval(self, tick_hz: u32) -> Option<Duration> {
        match self.normalize(tick_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / f64::from(hz))),
        }
    }
}
