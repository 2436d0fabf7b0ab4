//! Race session engine
//!
//! A [`RaceSession`] owns everything for one race: the clock, the captured
//! splits, the results grid and the winning time. All mutation goes through
//! its command methods (or [`RaceSession::apply`]), which run to completion
//! without blocking. The only state leaving the session on its own is the
//! [`RunState`], published on a watch channel for the display ticker.
//!
//! While the clock runs only `lap` and `stop` change anything. Lane, place,
//! winning-time, split and race-selection commands fail with
//! [`TimingError::IllegalStateTransition`] until the clock is stopped.
//!
//! ```rust
//! use regatta_clock::{ManualTimebase, RaceSession, SessionConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> regatta_clock::Result<()> {
//! let timebase = ManualTimebase::new();
//! let mut session = RaceSession::with_timebase(SessionConfig::default(), Arc::new(timebase.clone()));
//!
//! session.start()?;
//! timebase.advance(Duration::from_millis(401_200));
//! let finisher = session.lap()?;
//! session.stop()?;
//!
//! session.assign_lane(finisher, "3")?;
//! session.set_winning_time("00:00.8")?;
//! assert_eq!(session.record(finisher)?.split_text(), "06:41.2");
//! assert_eq!(session.record(finisher)?.time_text(), "06:42.0");
//! # Ok(())
//! # }
//! ```

mod command;
mod snapshot;


pub use command::{CommandOutcome, SessionCommand};
pub use snapshot::{RecordRow, SessionSnapshot};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::adjust::{TimeAdjuster, WinningOffset};
use crate::clock::{ClockPhase, ClockState, RunState};
use crate::config::SessionConfig;
use crate::grid::{ApprovalRow, ResultsGrid};
use crate::recorder::LapRecorder;
use crate::regatta::{RaceData, RegattaData};
use crate::ticker::{ClockTicker, DisplayFeed};
use crate::time_codec::format_time;
use crate::timebase::{SystemTimebase, Timebase};
use crate::types::{Lane, LapRecord, PlaceStatus, RecordId};
use crate::{Result, TimingError, lanes, places};

/// Results sheet shown to the referee for approval.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RefereeSheet {
    pub title: String,
    pub winning_time: String,
    pub rows: Vec<ApprovalRow>,
}

/// One race's timing session.
pub struct RaceSession {
    config: SessionConfig,
    timebase: Arc<dyn Timebase>,
    clock: ClockState,
    recorder: LapRecorder,
    grid: ResultsGrid,
    adjuster: TimeAdjuster,
    regatta: Option<RegattaData>,
    race_number: Option<u32>,
    approved: bool,
    run_state: watch::Sender<RunState>,
}

impl RaceSession {
    /// Session on the system clock.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_timebase(config, Arc::new(SystemTimebase))
    }

    pub fn with_timebase(config: SessionConfig, timebase: Arc<dyn Timebase>) -> Self {
        let (run_state, _) = watch::channel(RunState::Cleared);
        Self {
            recorder: LapRecorder::new(config.lap_limit),
            config,
            timebase,
            clock: ClockState::new(),
            grid: ResultsGrid::new(),
            adjuster: TimeAdjuster::default(),
            regatta: None,
            race_number: None,
            approved: false,
            run_state,
        }
    }

    /// Start the clock and record the start marker as split 1.
    pub fn start(&mut self) -> Result<RecordId> {
        self.clock.require(ClockPhase::Cleared, "start")?;
        let now = self.timebase.now();
        let id = self.recorder.record(Duration::ZERO)?;
        self.clock.start(now)?;
        self.adjuster.recompute(&mut self.recorder, &mut self.grid);
        self.publish_run_state();
        self.results_changed();
        info!("Race clock started");
        Ok(id)
    }

    /// Capture a split at the current elapsed time.
    pub fn lap(&mut self) -> Result<RecordId> {
        let raw = self.clock.split(self.timebase.now())?;
        let id = self.recorder.record(raw)?;
        self.adjuster.recompute(&mut self.recorder, &mut self.grid);
        self.results_changed();
        info!("Split {} at {}", id, format_time(raw));
        Ok(id)
    }

    pub fn stop(&mut self) -> Result<()> {
        let elapsed = self.clock.stop(self.timebase.now())?;
        self.publish_run_state();
        info!("Race clock stopped at {}", format_time(elapsed));
        Ok(())
    }

    /// Discard all splits and results and reset the winning time.
    ///
    /// Rejected while the clock runs; nothing changes in that case.
    pub fn clear(&mut self) -> Result<()> {
        self.clock.clear()?;
        self.recorder.clear();
        self.grid.clear_results();
        self.adjuster.reset();
        self.publish_run_state();
        self.results_changed();
        info!("Race clock cleared");
        Ok(())
    }

    /// Assign record `id` to the lane in `text`.
    ///
    /// `text` must be the bare lane number; surrounding whitespace makes it
    /// out of range. On a duplicate or out-of-range lane the record is left
    /// without a lane before the error is returned. Refused while the clock
    /// runs.
    pub fn assign_lane(&mut self, id: RecordId, text: &str) -> Result<Option<Lane>> {
        self.require_idle("assign a lane")?;
        self.recorder.get(id)?;
        let result = lanes::assign_lane(&mut self.recorder, &mut self.grid, id, text);
        self.results_changed();
        result
    }

    /// Assign a lane from a submitted input and return the record whose lane
    /// input takes focus next (`None` after the last record).
    pub fn submit_lane(&mut self, id: RecordId, text: &str) -> Result<Option<RecordId>> {
        self.assign_lane(id, text)?;
        Ok(self.recorder.next_after(id))
    }

    pub fn set_place_status(&mut self, lane: Lane, status: PlaceStatus) -> Result<()> {
        self.require_idle("change a place")?;
        places::set_place_status(&mut self.recorder, &mut self.grid, lane, status);
        self.results_changed();
        Ok(())
    }

    /// Set or clear (empty text) the certified winning time.
    ///
    /// The winning-time input is locked while the clock runs.
    pub fn set_winning_time(&mut self, text: &str) -> Result<()> {
        self.require_idle("set the winning time")?;
        self.adjuster.set_winning_time(text, &mut self.recorder, &mut self.grid)?;
        self.results_changed();
        Ok(())
    }

    /// Correct a split's raw time.
    pub fn edit_split(&mut self, id: RecordId, text: &str) -> Result<()> {
        self.require_idle("edit a split")?;
        self.adjuster.edit_split(&mut self.recorder, &mut self.grid, id, text)?;
        self.results_changed();
        Ok(())
    }

    /// Hand over the regatta table read by the import collaborator.
    ///
    /// The previously loaded race no longer applies: its school and info rows
    /// are blanked, the race number is dropped and any approval is revoked.
    /// Split results stay as they are.
    pub fn load_race_data(&mut self, regatta: RegattaData) {
        info!(
            "Loaded regatta '{}' with {} scheduled races",
            regatta.regatta_name,
            regatta.scheduled_races()
        );
        self.regatta = Some(regatta);
        self.race_number = None;
        self.approved = false;
        self.grid.clear_metadata();
    }

    /// Seed the school and info rows from race `race_number`.
    ///
    /// Fails without changing anything while the clock runs, without regatta
    /// data, or when the race is missing or has no boats.
    pub fn load_race(&mut self, race_number: u32) -> Result<()> {
        self.require_idle("load a race")?;
        let regatta = self.regatta.as_ref().ok_or(TimingError::NoRegattaData)?;
        let race = regatta.race(race_number).ok_or(TimingError::RaceNotFound { race_number })?;
        if !race.is_scheduled() {
            warn!("Race {} has no boats", race_number);
            return Err(TimingError::EmptyRace { race_number });
        }

        self.grid.seed(race);
        info!("Loaded {}", race.title());
        self.race_number = Some(race_number);
        self.results_changed();
        Ok(())
    }

    /// Results sheet for the referee. Requires a winning time.
    pub fn referee_sheet(&self) -> Result<RefereeSheet> {
        let winning = self.adjuster.winning_time().ok_or(TimingError::WinningTimeRequired)?;
        let title = self.current_race().map(RaceData::title).unwrap_or_else(|| "Race".to_string());
        Ok(RefereeSheet { title, winning_time: format_time(winning), rows: self.grid.approval_rows() })
    }

    /// Record the referee's approval of the current results.
    pub fn approve(&mut self) -> Result<()> {
        self.adjuster.winning_time().ok_or(TimingError::WinningTimeRequired)?;
        if let Some(race) = self.race_number.and_then(|n| self.regatta.as_mut()?.race_mut(n)) {
            race.approved = true;
        }
        self.approved = true;
        info!("Results approved");
        Ok(())
    }

    /// Dispatch a queued command.
    pub fn apply(&mut self, command: SessionCommand) -> Result<CommandOutcome> {
        debug!("Applying {}", command.name());
        match command {
            SessionCommand::Start => self.start().map(CommandOutcome::Recorded),
            SessionCommand::Lap => self.lap().map(CommandOutcome::Recorded),
            SessionCommand::Stop => self.stop().map(|()| CommandOutcome::Done),
            SessionCommand::Clear => self.clear().map(|()| CommandOutcome::Done),
            SessionCommand::AssignLane { record, text } => {
                self.assign_lane(record, &text).map(CommandOutcome::LaneAssigned)
            }
            SessionCommand::SubmitLane { record, text } => {
                self.submit_lane(record, &text).map(CommandOutcome::Focus)
            }
            SessionCommand::SetPlaceStatus { lane, status } => {
                self.set_place_status(lane, status).map(|()| CommandOutcome::Done)
            }
            SessionCommand::SetWinningTime { text } => {
                self.set_winning_time(&text).map(|()| CommandOutcome::Done)
            }
            SessionCommand::EditSplit { record, text } => {
                self.edit_split(record, &text).map(|()| CommandOutcome::Done)
            }
            SessionCommand::LoadRaceData { regatta } => {
                self.load_race_data(regatta);
                Ok(CommandOutcome::Done)
            }
            SessionCommand::LoadRace { race_number } => {
                self.load_race(race_number).map(|()| CommandOutcome::Done)
            }
            SessionCommand::Approve => self.approve().map(|()| CommandOutcome::Done),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn timebase(&self) -> Arc<dyn Timebase> {
        Arc::clone(&self.timebase)
    }

    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    pub fn phase(&self) -> ClockPhase {
        self.clock.phase()
    }

    /// Clock text right now: `00:00.0` when cleared, frozen after stop.
    pub fn clock_display(&self) -> String {
        self.clock.run_state().display_at(self.timebase.now())
    }

    /// Whether the race-number and winning-time inputs accept edits.
    pub fn inputs_enabled(&self) -> bool {
        !self.clock.is_running()
    }

    pub fn records(&self) -> &[LapRecord] {
        self.recorder.records()
    }

    pub fn record(&self, id: RecordId) -> Result<&LapRecord> {
        self.recorder.get(id)
    }

    pub fn grid(&self) -> &ResultsGrid {
        &self.grid
    }

    pub fn winning_time(&self) -> Option<Duration> {
        self.adjuster.winning_time()
    }

    pub fn winning_offset(&self) -> Option<WinningOffset> {
        self.adjuster.offset(&self.recorder)
    }

    pub fn regatta(&self) -> Option<&RegattaData> {
        self.regatta.as_ref()
    }

    pub fn race_number(&self) -> Option<u32> {
        self.race_number
    }

    pub fn current_race(&self) -> Option<&RaceData> {
        self.regatta.as_ref()?.race(self.race_number?)
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    /// Results may only be saved once approved.
    pub fn can_save(&self) -> bool {
        self.approved
    }

    /// Receiver for run state changes.
    pub fn run_state(&self) -> watch::Receiver<RunState> {
        self.run_state.subscribe()
    }

    /// Start a display ticker for this session.
    ///
    /// Must be called inside a tokio runtime.
    pub fn display_feed(&self) -> DisplayFeed {
        ClockTicker::spawn(
            self.run_state(),
            self.timebase(),
            self.config.tick_hz,
            self.config.display_rate,
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            race_number: self.race_number,
            race_title: self.current_race().map(RaceData::title),
            phase: self.phase(),
            clock_display: self.clock_display(),
            inputs_enabled: self.inputs_enabled(),
            winning_time: self.winning_time().map(format_time).unwrap_or_default(),
            approved: self.approved,
            records: self.records().iter().map(RecordRow::from).collect(),
            grid: self.grid.snapshot(),
        }
    }

    /// Fails with [`TimingError::IllegalStateTransition`] while the clock runs.
    fn require_idle(&self, command: &'static str) -> Result<()> {
        if self.clock.is_running() {
            warn!("Refused to {} while the clock is running", command);
            return Err(self.clock.illegal(command));
        }
        Ok(())
    }

    fn publish_run_state(&self) {
        let state = self.clock.run_state();
        self.run_state.send_replace(state);
        debug!("Run state now {}", self.clock.phase());
    }

    /// Results moved on, so any earlier approval no longer holds.
    fn results_changed(&mut self) {
        if !self.approved {
            return;
        }
        self.approved = false;
        if let Some(race) = self.race_number.and_then(|n| self.regatta.as_mut()?.race_mut(n)) {
            race.approved = false;
        }
        debug!("Results changed, approval revoked");
    }
}

impl std::fmt::Debug for RaceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceSession")
            .field("phase", &self.clock.phase())
            .field("records", &self.recorder.len())
            .field("race_number", &self.race_number)
            .field("approved", &self.approved)
            .finish_non_exhaustive()
    }
}
