//! Serializable view of a session

use serde::Serialize;

use crate::clock::ClockPhase;
use crate::grid::GridSnapshot;
use crate::types::{LapRecord, RecordId};

/// Everything the UI renders, as display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SessionSnapshot {
    pub race_number: Option<u32>,
    pub race_title: Option<String>,
    pub phase: ClockPhase,
    pub clock_display: String,
    pub inputs_enabled: bool,
    /// Empty when no winning time is set.
    pub winning_time: String,
    pub approved: bool,
    pub records: Vec<RecordRow>,
    pub grid: GridSnapshot,
}

/// One row of the lap table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RecordRow {
    pub id: RecordId,
    pub sequence: u32,
    pub lane: String,
    pub place: String,
    pub split: String,
    pub time: String,
}

impl From<&LapRecord> for RecordRow {
    fn from(record: &LapRecord) -> Self {
        Self {
            id: record.id(),
            sequence: record.sequence(),
            lane: record.lane_text(),
            place: record.place().to_string(),
            split: record.split_text(),
            time: record.time_text(),
        }
    }
}
