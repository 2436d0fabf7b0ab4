//! Race clock state machine
//!
//! ```text
//!   Cleared ──start──► Running ──stop──► Stopped ──clear──► Cleared
//! ```
//!
//! `start` is only legal from `Cleared`, `lap` and `stop` only while
//! `Running`, and `clear` whenever the clock is not running.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

use crate::time_codec::{ZERO_TIME, format_time};
use crate::{Result, TimingError};

/// Phase of the race clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum ClockPhase {
    Cleared,
    Running,
    Stopped,
}

impl fmt::Display for ClockPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClockPhase::Cleared => "cleared",
            ClockPhase::Running => "running",
            ClockPhase::Stopped => "stopped",
        })
    }
}

/// What the display ticker needs to know about the clock.
///
/// Published by the session whenever the phase changes. It carries no
/// references into split records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Cleared,
    Running { started: Instant },
    Stopped { elapsed: Duration },
}

impl RunState {
    /// Display text for this state at `now`.
    pub fn display_at(&self, now: Instant) -> String {
        match self {
            RunState::Cleared => ZERO_TIME.to_string(),
            RunState::Running { started } => format_time(now.saturating_duration_since(*started)),
            RunState::Stopped { elapsed } => format_time(*elapsed),
        }
    }
}

/// Clock state owned by a race session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    state: RunState,
}

impl ClockState {
    pub fn new() -> Self {
        Self { state: RunState::Cleared }
    }

    pub fn phase(&self) -> ClockPhase {
        match self.state {
            RunState::Cleared => ClockPhase::Cleared,
            RunState::Running { .. } => ClockPhase::Running,
            RunState::Stopped { .. } => ClockPhase::Stopped,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running { .. })
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self.state, RunState::Cleared)
    }

    /// Instant the clock was started, while running.
    pub fn started_at(&self) -> Option<Instant> {
        match self.state {
            RunState::Running { started } => Some(started),
            _ => None,
        }
    }

    pub(crate) fn start(&mut self, now: Instant) -> Result<()> {
        self.require(ClockPhase::Cleared, "start")?;
        self.state = RunState::Running { started: now };
        Ok(())
    }

    /// Elapsed time for a new split.
    pub(crate) fn split(&self, now: Instant) -> Result<Duration> {
        match self.state {
            RunState::Running { started } => Ok(now.saturating_duration_since(started)),
            _ => Err(self.illegal("record a split")),
        }
    }

    pub(crate) fn stop(&mut self, now: Instant) -> Result<Duration> {
        let elapsed = self.split(now).map_err(|_| self.illegal("stop"))?;
        self.state = RunState::Stopped { elapsed };
        Ok(elapsed)
    }

    pub(crate) fn clear(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(self.illegal("clear"));
        }
        self.state = RunState::Cleared;
        Ok(())
    }

    /// Fails with [`TimingError::IllegalStateTransition`] unless in `phase`.
    pub(crate) fn require(&self, phase: ClockPhase, command: &'static str) -> Result<()> {
        if self.phase() == phase { Ok(()) } else { Err(self.illegal(command)) }
    }

    pub(crate) fn illegal(&self, command: &'static str) -> TimingError {
        TimingError::IllegalStateTransition { command, phase: self.phase() }
    }
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new()
    }
}
