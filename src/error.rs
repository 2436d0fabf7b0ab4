//! Error types for race timing.
//!
//! Every condition the engine reports is local and non-fatal: the offending
//! input is rejected or reset to a safe value and the session carries on.
//! Where a command resets state before reporting (a duplicate lane clears the
//! record's lane, for example), the reset has already been applied when the
//! error is returned.
//!
//! ## Error Categories
//!
//! - **Input Errors**: malformed times, lanes outside 1-6, duplicate lanes
//! - **State Errors**: commands issued in the wrong clock phase
//! - **Race Data Errors**: missing regatta data or unknown races
//! - **Session Errors**: the hosting task has shut down
//!
//! ```rust
//! use regatta_clock::TimingError;
//!
//! let error = regatta_clock::parse_time("5:23").unwrap_err();
//! assert!(matches!(error, TimingError::InvalidTimeFormat { .. }));
//! assert!(error.is_recoverable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use thiserror::Error;

use crate::clock::ClockPhase;
use crate::types::{Lane, RecordId};

/// Result type alias for timing operations.
pub type Result<T, E = TimingError> = std::result::Result<T, E>;

/// Main error type for timing operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimingError {
    #[error("Invalid time '{input}': {details}")]
    InvalidTimeFormat { input: String, details: String },

    #[error("Lane {lane} is already assigned to split {holder}")]
    DuplicateLaneAssignment { lane: Lane, holder: RecordId },

    #[error("'{input}' is not a lane between 1 and 6")]
    OutOfRangeLane { input: String },

    #[error("Cannot {command} while the clock is {phase}")]
    IllegalStateTransition { command: &'static str, phase: ClockPhase },

    #[error("Split {id} does not exist")]
    UnknownRecord { id: RecordId },

    #[error("Adjusted time for split {id} would be negative")]
    NegativeAdjustedTime { id: RecordId },

    #[error("Split limit of {limit} reached")]
    LapLimitReached { limit: usize },

    #[error("No regatta data available - import a regatta table first")]
    NoRegattaData,

    #[error("Race number {race_number} not found")]
    RaceNotFound { race_number: u32 },

    #[error("No boats found in race {race_number}")]
    EmptyRace { race_number: u32 },

    #[error("A winning time is required before referee approval")]
    WinningTimeRequired,

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Race session has shut down")]
    SessionClosed,
}

impl TimingError {
    /// Whether the session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TimingError::SessionClosed)
    }

    /// Returns suggested operator actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TimingError::InvalidTimeFormat { .. } => {
                vec!["Enter times as mm:ss.t (for example 05:23.4)", "Leave empty for no time"]
            }
            TimingError::DuplicateLaneAssignment { .. } => vec![
                "Clear the lane from the other split first",
                "Check the lane order against the finish line",
            ],
            TimingError::OutOfRangeLane { .. } => vec!["Enter a lane number from 1 to 6"],
            TimingError::IllegalStateTransition { .. } => vec![
                "Stop the clock before clearing or loading a race",
                "Clear the clock before starting a new race",
            ],
            TimingError::UnknownRecord { .. } => vec!["Refresh the lap table"],
            TimingError::NegativeAdjustedTime { .. } => vec![
                "Check the winning time against the first split",
                "Correct the edited split",
            ],
            TimingError::LapLimitReached { .. } => {
                vec!["Raise the split limit in the session configuration"]
            }
            TimingError::NoRegattaData => vec!["Import the regatta table"],
            TimingError::RaceNotFound { .. } | TimingError::EmptyRace { .. } => {
                vec!["Check the race number against the regatta schedule"]
            }
            TimingError::WinningTimeRequired => vec!["Enter the certified winning time"],
            TimingError::Parse { .. } => vec!["Check the file format", "Re-export the data"],
            TimingError::SessionClosed => vec!["Open the race again"],
        }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl ToString) -> Self {
        TimingError::Parse { context: context.into(), details: details.to_string() }
    }
}
