//! Scheduled race and lane entry
//!
//! A race is one 5-row block of the regatta table: a race number, up to six
//! lane entries, and the raw text rows the import collaborator read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Lane;

/// Crew entered in a lane
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct LaneEntry {
    /// School or club name
    pub school_name: String,
    /// Crew designation or other notes
    pub additional_info: String,
}

/// One scheduled race
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct RaceData {
    /// Race number from the schedule
    pub race_number: u32,
    /// Lane number (1-6) to entry; empty lanes are absent
    pub lanes: BTreeMap<u8, LaneEntry>,
    /// Text rows of the race block; column 0 of the first two rows holds
    /// the boat class and the heat/flight
    pub raw_data: Vec<Vec<String>>,
    /// Set once the referee approved the results
    pub approved: bool,
}

impl RaceData {
    pub fn entry(&self, lane: Lane) -> Option<&LaneEntry> {
        self.lanes.get(&lane.number())
    }

    /// Whether the race has any entries at all.
    pub fn is_scheduled(&self) -> bool {
        !self.lanes.is_empty()
    }

    /// Lanes with a school name.
    pub fn boat_count(&self) -> usize {
        self.lanes.values().filter(|entry| !entry.school_name.is_empty()).count()
    }

    pub fn boat_class(&self) -> Option<&str> {
        self.raw_cell(0)
    }

    /// Heat, flight or final designation.
    pub fn flight(&self) -> Option<&str> {
        self.raw_cell(1)
    }

    /// Title line, e.g. `Race 4 (5 Boats) - Men's 8+ - Heat 2`.
    pub fn title(&self) -> String {
        let mut title = format!("Race {} ({} Boats)", self.race_number, self.boat_count());
        for part in [self.boat_class(), self.flight()].into_iter().flatten() {
            title.push_str(" - ");
            title.push_str(part);
        }
        title
    }

    fn raw_cell(&self, row: usize) -> Option<&str> {
        self.raw_data
            .get(row)
            .and_then(|cells| cells.first())
            .map(String::as_str)
            .filter(|cell| !cell.is_empty())
    }
}
