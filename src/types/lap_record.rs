//! A single recorded split

use serde::Serialize;
use std::time::Duration;

use super::{Lane, Place, RecordId};
use crate::time_codec::format_time;

/// One split captured while the clock ran.
///
/// The raw split is the elapsed time since start. The adjusted time is derived
/// from it by the winning-time offset and is `None` only when that offset
/// would push it below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LapRecord {
    id: RecordId,
    raw_time: Duration,
    adjusted_time: Option<Duration>,
    lane: Option<Lane>,
    place: Place,
}

impl LapRecord {
    pub(crate) fn new(id: RecordId, raw_time: Duration) -> Self {
        Self {
            id,
            raw_time,
            adjusted_time: Some(raw_time),
            lane: None,
            place: Place::Position(id.sequence()),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn sequence(&self) -> u32 {
        self.id.sequence()
    }

    pub fn raw_time(&self) -> Duration {
        self.raw_time
    }

    pub fn adjusted_time(&self) -> Option<Duration> {
        self.adjusted_time
    }

    pub fn lane(&self) -> Option<Lane> {
        self.lane
    }

    pub fn place(&self) -> Place {
        self.place
    }

    /// Split as shown in the lap table, `mm:ss.t`.
    pub fn split_text(&self) -> String {
        format_time(self.raw_time)
    }

    /// Adjusted time as shown in the lap table; empty when not derivable.
    pub fn time_text(&self) -> String {
        self.adjusted_time.map(format_time).unwrap_or_default()
    }

    /// Contents of the lane input for this record.
    pub fn lane_text(&self) -> String {
        self.lane.map(|lane| lane.to_string()).unwrap_or_default()
    }

    pub(crate) fn set_raw_time(&mut self, raw_time: Duration) {
        self.raw_time = raw_time;
    }

    pub(crate) fn set_adjusted_time(&mut self, adjusted: Option<Duration>) {
        self.adjusted_time = adjusted;
    }

    pub(crate) fn set_lane(&mut self, lane: Option<Lane>) {
        self.lane = lane;
    }

    pub(crate) fn set_place(&mut self, place: Place) {
        self.place = place;
    }
}
