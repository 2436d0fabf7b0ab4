//! Lane numbers and split-record identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of lanes on the course, and columns in the results grid.
pub const LANE_COUNT: usize = 6;

/// A lane number in `1..=6` (the "OOF" column of the lap table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(try_from = "u8", into = "u8")]
pub struct Lane(u8);

impl Lane {
    /// Build a lane from its number, `None` outside `1..=6`.
    pub fn new(number: u8) -> Option<Self> {
        (1..=LANE_COUNT as u8).contains(&number).then_some(Lane(number))
    }

    /// Parse operator text into a lane.
    ///
    /// Anything that is not an integer in `1..=6` yields `None`, including
    /// text with surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        text.parse::<u8>().ok().and_then(Lane::new)
    }

    /// All lanes in course order.
    pub fn all() -> impl Iterator<Item = Lane> {
        (1..=LANE_COUNT as u8).map(Lane)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based column index into per-lane storage.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Column header shown above the lane in the results grid.
    pub fn header(self) -> String {
        format!("Lane {}", self.0)
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Lane {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Lane::new(value).ok_or_else(|| format!("lane {} is outside 1..={}", value, LANE_COUNT))
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> Self {
        lane.0
    }
}

/// Stable identifier of a split record: its capture sequence number.
///
/// Sequence numbers start at 1 (the start marker) and are never reused within
/// a race; they only reset when the clock is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(transparent)]
pub struct RecordId(u32);

impl RecordId {
    pub const fn new(sequence: u32) -> Self {
        RecordId(sequence)
    }

    pub fn sequence(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
