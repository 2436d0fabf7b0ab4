//! Race-timing engine for rowing and sculling regattas.
//!
//! Regatta Clock runs the timing desk of one race: an operator starts the
//! clock, captures a split as each boat crosses the line, assigns splits to
//! lanes and reconciles them against the certified winning time. The output
//! is a six-lane results grid (place, split, adjusted time) ready for referee
//! approval.
//!
//! # Features
//!
//! - **Deterministic**: every command runs to completion on the session that
//!   owns the race; the wall clock sits behind the [`Timebase`] trait
//! - **Live display**: a tokio ticker publishes the running clock at 10 Hz
//!   without touching split records
//! - **Single owner**: [`SessionHost`] serialises commands from any number
//!   of callers onto one task
//! - **Front-end ready**: snapshots serialise with serde; the `tauri` feature
//!   derives `specta::Type` for TypeScript bindings
//!
//! # Quick Start
//!
//! ```rust
//! use regatta_clock::{Lane, ManualTimebase, PlaceStatus, RaceSession, SessionConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> regatta_clock::Result<()> {
//! let timebase = ManualTimebase::new();
//! let mut session = RaceSession::with_timebase(SessionConfig::default(), Arc::new(timebase.clone()));
//!
//! session.start()?;
//! let mut finishers = Vec::new();
//! for secs in [401, 403, 406] {
//!     timebase.advance(Duration::from_secs(secs) - timebase.elapsed());
//!     finishers.push(session.lap()?);
//! }
//! session.stop()?;
//!
//! for (lane, id) in ["2", "5", "3"].into_iter().zip(&finishers) {
//!     session.assign_lane(*id, lane)?;
//! }
//! let lane3 = Lane::new(3).unwrap();
//! session.set_place_status(lane3, PlaceStatus::NextPlace)?;
//! assert_eq!(session.grid().place(lane3).map(|p| p.to_string()).as_deref(), Some("3"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Hosted session
//!
//! ```rust,no_run
//! use regatta_clock::{RaceSession, SessionCommand, SessionConfig, SessionHost};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> regatta_clock::Result<()> {
//!     let handle = SessionHost::spawn(RaceSession::new(SessionConfig::default()));
//!     let feed = handle.display_feed();
//!     let mut clock = feed.updates();
//!
//!     handle.send(SessionCommand::Start).await?;
//!     while let Some(text) = clock.next().await {
//!         println!("{}", text);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod time_codec;
pub mod types;

// Timing engine
pub mod adjust;
pub mod clock;
pub mod config;
pub mod grid;
mod lanes;
mod places;
pub mod recorder;
pub mod session;

// Race data from the import collaborator
pub mod regatta;

// Async surface
pub mod host;
pub mod stream;
pub mod ticker;
pub mod timebase;

// Core exports
pub use error::*;
pub use types::*;

pub use time_codec::{ZERO_TIME, format_time, parse_time};

// Engine exports
pub use adjust::{TimeAdjuster, WinningOffset};
pub use clock::{ClockPhase, ClockState, RunState};
pub use config::SessionConfig;
pub use grid::{ApprovalRow, GridRow, GridSnapshot, LaneColumn, ResultsGrid};
pub use recorder::LapRecorder;
pub use session::{
    CommandOutcome, RaceSession, RecordRow, RefereeSheet, SessionCommand, SessionSnapshot,
};

pub use regatta::{LaneEntry, RaceData, RegattaData};

// Main API exports
pub use host::{SessionHandle, SessionHost};
pub use ticker::{ClockTicker, DisplayFeed};
pub use timebase::{ManualTimebase, SystemTimebase, Timebase};
