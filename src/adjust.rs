//! Winning-time adjustment
//!
//! The certified winning time is pinned to the first split (the start
//! marker). Every other split is shifted by the same offset:
//!
//! ```text
//! adjusted = raw + (winning - first.raw)
//! ```
//!
//! The offset is never stored; it is rebuilt from the winning time and the
//! first record each time adjusted times are republished.

use std::time::Duration;

use tracing::{debug, warn};

use crate::grid::ResultsGrid;
use crate::recorder::LapRecorder;
use crate::time_codec::parse_time;
use crate::types::{LapRecord, RecordId};
use crate::{Result, TimingError};

/// Offset between the winning time and the first split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningOffset {
    winning: Duration,
    first_split: Duration,
}

impl WinningOffset {
    pub fn new(winning: Duration, first_split: Duration) -> Self {
        Self { winning, first_split }
    }

    /// Adjusted time for `raw`, or `None` when it would be negative.
    pub fn apply(&self, raw: Duration) -> Option<Duration> {
        (raw + self.winning).checked_sub(self.first_split)
    }

    pub fn is_zero(&self) -> bool {
        self.winning == self.first_split
    }

    /// Signed offset in milliseconds.
    pub fn as_millis(&self) -> i128 {
        self.winning.as_millis() as i128 - self.first_split.as_millis() as i128
    }
}

/// Holds the winning time and republishes adjusted times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeAdjuster {
    winning_time: Option<Duration>,
}

impl TimeAdjuster {
    pub fn winning_time(&self) -> Option<Duration> {
        self.winning_time
    }

    /// Current offset; `None` until both a winning time and a first split exist.
    pub fn offset(&self, records: &LapRecorder) -> Option<WinningOffset> {
        let winning = self.winning_time?;
        records.first().map(|first| WinningOffset::new(winning, first.raw_time()))
    }

    /// Adjusted time for `raw` under the current offset.
    ///
    /// Without a winning time the adjusted time is the raw split.
    fn adjust(offset: Option<WinningOffset>, raw: Duration) -> Option<Duration> {
        match offset {
            Some(offset) => offset.apply(raw),
            None => Some(raw),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.winning_time = None;
    }

    /// Replace the winning time from operator text.
    ///
    /// Empty text removes it, so adjusted times fall back to the raw splits.
    /// Malformed text, or a time that would push any split negative, is
    /// rejected with nothing changed.
    pub(crate) fn set_winning_time(
        &mut self,
        text: &str,
        records: &mut LapRecorder,
        grid: &mut ResultsGrid,
    ) -> Result<()> {
        let winning = if text.is_empty() { None } else { Some(parse_time(text)?) };
        let candidate = TimeAdjuster { winning_time: winning };
        let offset = candidate.offset(records);
        if let Some(offset) = offset {
            check_offset(offset, records.records().iter().map(|r| (r.id(), r.raw_time())))?;
        }

        *self = candidate;
        self.recompute(records, grid);
        match offset {
            Some(offset) => debug!("Winning time set, offset {} ms", offset.as_millis()),
            None => debug!("Winning time {}", if winning.is_some() { "stored" } else { "cleared" }),
        }
        Ok(())
    }

    /// Republish every record's adjusted time and the Time cell of its lane.
    ///
    /// Splits that cannot be adjusted keep their raw time and show no
    /// adjusted time. Lanes marked DQ/DNF/DNS keep their Time cell empty.
    pub(crate) fn recompute(&self, records: &mut LapRecorder, grid: &mut ResultsGrid) {
        let offset = self.offset(records);
        for record in records.iter_mut() {
            let adjusted = Self::adjust(offset, record.raw_time());
            if adjusted.is_none() {
                warn!("Split {} falls before the winning-time offset", record.id());
            }
            record.set_adjusted_time(adjusted);
            publish_time(grid, record);
        }
    }

    /// Replace a split's raw time from operator text.
    ///
    /// The edited lane's Split and Time cells are rewritten; places are not
    /// renumbered. Editing the first split moves the offset, so every
    /// adjusted time is refreshed.
    pub(crate) fn edit_split(
        &self,
        records: &mut LapRecorder,
        grid: &mut ResultsGrid,
        id: RecordId,
        text: &str,
    ) -> Result<()> {
        let raw = parse_time(text)?;
        records.get(id)?;

        if let Some(winning) = self.winning_time {
            let first_split = match records.first() {
                Some(first) if first.id() == id => raw,
                Some(first) => first.raw_time(),
                None => raw,
            };
            let offset = WinningOffset::new(winning, first_split);
            let candidates = records
                .records()
                .iter()
                .map(|r| (r.id(), if r.id() == id { raw } else { r.raw_time() }));
            check_offset(offset, candidates)?;
        }

        let record = records.get_mut(id)?;
        record.set_raw_time(raw);
        if let Some(lane) = record.lane().filter(|_| record.place().is_ranked()) {
            grid.set_times(lane, Some(raw), None);
        }
        self.recompute(records, grid);
        debug!("Split {} edited to {:?}", id, raw);
        Ok(())
    }
}

fn check_offset(
    offset: WinningOffset,
    mut splits: impl Iterator<Item = (RecordId, Duration)>,
) -> Result<()> {
    match splits.find(|&(_, raw)| offset.apply(raw).is_none()) {
        Some((id, _)) => {
            warn!("Rejected change: split {} would have a negative adjusted time", id);
            Err(TimingError::NegativeAdjustedTime { id })
        }
        None => Ok(()),
    }
}

fn publish_time(grid: &mut ResultsGrid, record: &LapRecord) {
    if let Some(lane) = record.lane().filter(|_| record.place().is_ranked()) {
        grid.set_time(lane, record.adjusted_time());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridRow;
    use crate::lanes::assign_lane;
    use crate::types::Lane;

    fn lane(n: u8) -> Lane {
        Lane::new(n).unwrap()
    }

    fn id(n: u32) -> RecordId {
        RecordId::new(n)
    }

    /// First split at 2.0s, finishers at 6:40.0 and 6:45.5 in lanes 3 and 1.
    fn race() -> (LapRecorder, ResultsGrid) {
        let mut records = LapRecorder::new(None);
        let mut grid = ResultsGrid::new();
        records.record(Duration::from_secs(2)).unwrap();
        records.record(Duration::from_secs(400)).unwrap();
        records.record(Duration::from_millis(405_500)).unwrap();
        assign_lane(&mut records, &mut grid, id(2), "3").unwrap();
        assign_lane(&mut records, &mut grid, id(3), "1").unwrap();
        (records, grid)
    }

    #[test]
    fn offset_applies_and_saturates() {
        let offset = WinningOffset::new(Duration::from_secs(10), Duration::from_secs(4));
        assert_eq!(offset.apply(Duration::from_secs(1)), Some(Duration::from_secs(7)));
        assert_eq!(offset.as_millis(), 6_000);

        let negative = WinningOffset::new(Duration::from_secs(1), Duration::from_secs(5));
        assert_eq!(negative.apply(Duration::from_secs(3)), None);
        assert_eq!(negative.apply(Duration::from_secs(4)), Some(Duration::ZERO));
        assert!(!negative.is_zero());
    }

    #[test]
    fn winning_time_equal_to_first_split_is_a_zero_offset() {
        let (mut records, mut grid) = race();
        let mut adjuster = TimeAdjuster::default();
        adjuster.set_winning_time("00:02.0", &mut records, &mut grid).unwrap();
        assert!(adjuster.offset(&records).unwrap().is_zero());
        for lane in [lane(1), lane(3)] {
            assert_eq!(grid.cell(GridRow::Time, lane), grid.cell(GridRow::Split, lane));
        }
    }

    #[test]
    fn winning_time_shifts_every_assigned_lane() {
        let (mut records, mut grid) = race();
        let mut adjuster = TimeAdjuster::default();
        adjuster.set_winning_time("00:12.0", &mut records, &mut grid).unwrap();
        assert_eq!(grid.cell(GridRow::Time, lane(3)), "06:50.0");
        assert_eq!(grid.cell(GridRow::Time, lane(1)), "06:55.5");
        assert_eq!(grid.cell(GridRow::Split, lane(1)), "06:45.5");
        assert_eq!(records.get(id(1)).unwrap().time_text(), "00:12.0");
    }

    #[test]
    fn clearing_the_winning_time_reverts_to_raw() {
        let (mut records, mut grid) = race();
        let mut adjuster = TimeAdjuster::default();
        adjuster.set_winning_time("00:12.0", &mut records, &mut grid).unwrap();
        adjuster.set_winning_time("", &mut records, &mut grid).unwrap();
        assert_eq!(adjuster.winning_time(), None);
        assert_eq!(grid.cell(GridRow::Time, lane(3)), "06:40.0");
    }

    #[test]
    fn malformed_winning_time_changes_nothing() {
        let (mut records, mut grid) = race();
        let mut adjuster = TimeAdjuster::default();
        adjuster.set_winning_time("00:12.0", &mut records, &mut grid).unwrap();
        let before = grid.clone();

        for bad in ["12 seconds", " 00:13.0", "00:13.0 "] {
            let err = adjuster.set_winning_time(bad, &mut records, &mut grid).unwrap_err();
            assert!(matches!(err, TimingError::InvalidTimeFormat { .. }), "{:?}", bad);
        }
        assert_eq!(adjuster.winning_time(), Some(Duration::from_secs(12)));
        assert_eq!(grid, before);
    }

    #[test]
    fn edit_split_rewrites_the_lane_and_rejects_negative_results() {
        let (mut records, mut grid) = race();
        let mut adjuster = TimeAdjuster::default();
        adjuster.set_winning_time("00:01.0", &mut records, &mut grid).unwrap();

        adjuster.edit_split(&mut records, &mut grid, id(2), "06:30.0").unwrap();
        assert_eq!(grid.cell(GridRow::Split, lane(3)), "06:30.0");
        assert_eq!(grid.cell(GridRow::Time, lane(3)), "06:29.0");
        assert_eq!(grid.place(lane(3)), Some(crate::types::Place::Position(2)));

        let err = adjuster.edit_split(&mut records, &mut grid, id(3), "00:00.5").unwrap_err();
        assert_eq!(err, TimingError::NegativeAdjustedTime { id: id(3) });
        assert_eq!(grid.cell(GridRow::Split, lane(1)), "06:45.5");
    }

    #[test]
    fn editing_the_first_split_moves_the_offset() {
        let (mut records, mut grid) = race();
        let mut adjuster = TimeAdjuster::default();
        adjuster.set_winning_time("00:02.0", &mut records, &mut grid).unwrap();
        adjuster.edit_split(&mut records, &mut grid, id(1), "00:00.0").unwrap();
        assert_eq!(grid.cell(GridRow::Time, lane(3)), "06:42.0");
    }

    #[test]
    fn recompute_blanks_unadjustable_splits() {
        let mut records = LapRecorder::new(None);
        let mut grid = ResultsGrid::new();
        records.record(Duration::from_secs(10)).unwrap();
        let mut adjuster = TimeAdjuster::default();
        adjuster.set_winning_time("00:05.0", &mut records, &mut grid).unwrap();

        // A later split recorded before the offset point cannot be adjusted.
        records.record(Duration::from_secs(2)).unwrap();
        adjuster.recompute(&mut records, &mut grid);
        assert_eq!(records.get(id(2)).unwrap().adjusted_time(), None);
        assert_eq!(records.get(id(2)).unwrap().time_text(), "");
    }
}
