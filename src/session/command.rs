//! Operator commands

use serde::{Deserialize, Serialize};

use crate::regatta::RegattaData;
use crate::types::{Lane, PlaceStatus, RecordId};

/// A command from the operator surface.
///
/// Each variant maps onto one [`RaceSession`](super::RaceSession) method;
/// [`RaceSession::apply`](super::RaceSession::apply) dispatches them so a
/// host task can queue commands from any number of callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SessionCommand {
    Start,
    Lap,
    Stop,
    Clear,
    AssignLane { record: RecordId, text: String },
    /// Same as `AssignLane`, answering with the record that takes focus next.
    SubmitLane { record: RecordId, text: String },
    SetPlaceStatus { lane: Lane, status: PlaceStatus },
    SetWinningTime { text: String },
    EditSplit { record: RecordId, text: String },
    LoadRaceData { regatta: RegattaData },
    LoadRace { race_number: u32 },
    Approve,
}

impl SessionCommand {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::Start => "start",
            SessionCommand::Lap => "lap",
            SessionCommand::Stop => "stop",
            SessionCommand::Clear => "clear",
            SessionCommand::AssignLane { .. } => "assign_lane",
            SessionCommand::SubmitLane { .. } => "submit_lane",
            SessionCommand::SetPlaceStatus { .. } => "set_place_status",
            SessionCommand::SetWinningTime { .. } => "set_winning_time",
            SessionCommand::EditSplit { .. } => "edit_split",
            SessionCommand::LoadRaceData { .. } => "load_race_data",
            SessionCommand::LoadRace { .. } => "load_race",
            SessionCommand::Approve => "approve",
        }
    }
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// A split was captured (`Start` records the start marker).
    Recorded(RecordId),
    /// The record's lane after the change.
    LaneAssigned(Option<Lane>),
    /// Record whose lane input should take focus next.
    Focus(Option<RecordId>),
    Done,
}
