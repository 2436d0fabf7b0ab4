//! Lane assignment
//!
//! Maps split records to lanes while keeping each lane held by at most one
//! record. Every path that takes a lane away from a record also blanks that
//! lane's place, split and time cells.

use tracing::{debug, warn};

use crate::grid::ResultsGrid;
use crate::recorder::LapRecorder;
use crate::types::{Lane, LapRecord, RecordId};
use crate::{Result, TimingError};

/// Apply operator lane text to record `id`.
///
/// - a free lane (or the lane the record already holds) is committed and the
///   record's place, split and time are written into it
/// - a lane held by another record resets this record to no lane and fails
///   with [`TimingError::DuplicateLaneAssignment`]; the other record's cells
///   are untouched
/// - empty text unassigns; other text unassigns and fails with
///   [`TimingError::OutOfRangeLane`]
pub(crate) fn assign_lane(
    records: &mut LapRecorder,
    grid: &mut ResultsGrid,
    id: RecordId,
    text: &str,
) -> Result<Option<Lane>> {
    let previous = records.get(id)?.lane();
    let Some(lane) = Lane::parse(text) else {
        release(records, grid, id)?;
        if text.is_empty() {
            debug!("Split {} unassigned", id);
            return Ok(None);
        }
        warn!("Rejected lane '{}' for split {}", text, id);
        return Err(TimingError::OutOfRangeLane { input: text.to_string() });
    };

    if let Some(holder) = records.holder_of(lane).map(LapRecord::id).filter(|&h| h != id) {
        release(records, grid, id)?;
        warn!("Lane {} already held by split {}, cleared split {}", lane, holder, id);
        return Err(TimingError::DuplicateLaneAssignment { lane, holder });
    }

    if let Some(old) = previous.filter(|&old| old != lane) {
        grid.clear_result(old);
    }

    let record = records.get_mut(id)?;
    record.set_lane(Some(lane));
    write_lane(grid, lane, record);
    debug!("Split {} assigned to lane {}", id, lane);
    Ok(Some(lane))
}

/// Write a record's place and times into its lane.
///
/// Unranked places (DQ/DNF/DNS) carry no split or time.
fn write_lane(grid: &mut ResultsGrid, lane: Lane, record: &LapRecord) {
    if record.place().is_ranked() {
        grid.write_result(lane, record.place(), record.raw_time(), record.adjusted_time());
    } else {
        grid.set_place(lane, record.place());
        grid.set_times(lane, None, None);
    }
}

/// Take record `id` off its lane, blanking that lane's result cells.
fn release(records: &mut LapRecorder, grid: &mut ResultsGrid, id: RecordId) -> Result<()> {
    let record = records.get_mut(id)?;
    if let Some(old) = record.lane() {
        grid.clear_result(old);
        record.set_lane(None);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridRow;
    use crate::types::Place;
    use std::time::Duration;

    fn setup(splits: &[u64]) -> (LapRecorder, ResultsGrid) {
        let mut records = LapRecorder::new(None);
        for &secs in splits {
            records.record(Duration::from_secs(secs)).unwrap();
        }
        (records, ResultsGrid::new())
    }

    fn lane(n: u8) -> Lane {
        Lane::new(n).unwrap()
    }

    fn id(n: u32) -> RecordId {
        RecordId::new(n)
    }

    #[test]
    fn assigning_writes_place_split_and_time() {
        let (mut records, mut grid) = setup(&[0, 400]);
        assert_eq!(assign_lane(&mut records, &mut grid, id(2), "4").unwrap(), Some(lane(4)));
        assert_eq!(grid.place(lane(4)), Some(Place::Position(2)));
        assert_eq!(grid.cell(GridRow::Split, lane(4)), "06:40.0");
        assert_eq!(grid.cell(GridRow::Time, lane(4)), "06:40.0");
        assert_eq!(records.get(id(2)).unwrap().lane(), Some(lane(4)));
    }

    #[test]
    fn moving_lanes_clears_the_old_lane() {
        let (mut records, mut grid) = setup(&[0, 400]);
        assign_lane(&mut records, &mut grid, id(2), "4").unwrap();
        assign_lane(&mut records, &mut grid, id(2), "5").unwrap();
        assert!(!grid.column(lane(4)).has_result());
        assert!(grid.column(lane(5)).has_result());
    }

    #[test]
    fn reassigning_the_same_lane_is_not_a_duplicate() {
        let (mut records, mut grid) = setup(&[0, 400]);
        assign_lane(&mut records, &mut grid, id(2), "4").unwrap();
        assert_eq!(assign_lane(&mut records, &mut grid, id(2), "4").unwrap(), Some(lane(4)));
    }

    #[test]
    fn duplicate_lane_resets_the_requesting_record_only() {
        let (mut records, mut grid) = setup(&[0, 400, 410]);
        assign_lane(&mut records, &mut grid, id(2), "3").unwrap();
        assign_lane(&mut records, &mut grid, id(3), "5").unwrap();

        let err = assign_lane(&mut records, &mut grid, id(3), "3").unwrap_err();
        assert_eq!(err, TimingError::DuplicateLaneAssignment { lane: lane(3), holder: id(2) });

        assert_eq!(records.get(id(3)).unwrap().lane(), None);
        assert_eq!(records.get(id(3)).unwrap().lane_text(), "");
        assert!(!grid.column(lane(5)).has_result(), "previous lane of the rejected split is cleared");
        assert_eq!(grid.place(lane(3)), Some(Place::Position(2)));
        assert_eq!(grid.cell(GridRow::Split, lane(3)), "06:40.0");
    }

    #[test]
    fn out_of_range_text_unassigns_and_reports() {
        let (mut records, mut grid) = setup(&[0, 400]);
        assign_lane(&mut records, &mut grid, id(2), "2").unwrap();
        for bad in ["7", "0", "x", " "] {
            let err = assign_lane(&mut records, &mut grid, id(2), bad).unwrap_err();
            assert!(matches!(err, TimingError::OutOfRangeLane { .. }));
        }
        assert_eq!(records.get(id(2)).unwrap().lane(), None);
        assert!(!grid.column(lane(2)).has_result());
    }

    #[test]
    fn padded_lane_text_is_out_of_range() {
        let (mut records, mut grid) = setup(&[0, 400]);
        assign_lane(&mut records, &mut grid, id(2), "2").unwrap();
        let err = assign_lane(&mut records, &mut grid, id(2), " 3 ").unwrap_err();
        assert_eq!(err, TimingError::OutOfRangeLane { input: " 3 ".to_string() });
        assert_eq!(records.get(id(2)).unwrap().lane(), None);
        assert!(!grid.column(lane(2)).has_result());
        assert!(!grid.column(lane(3)).has_result());
    }

    #[test]
    fn empty_text_unassigns_quietly() {
        let (mut records, mut grid) = setup(&[0, 400]);
        assign_lane(&mut records, &mut grid, id(2), "2").unwrap();
        assert_eq!(assign_lane(&mut records, &mut grid, id(2), "").unwrap(), None);
        assert!(!grid.column(lane(2)).has_result());
    }

    #[test]
    fn unknown_record_is_rejected_without_changes() {
        let (mut records, mut grid) = setup(&[0]);
        let err = assign_lane(&mut records, &mut grid, id(9), "1").unwrap_err();
        assert_eq!(err, TimingError::UnknownRecord { id: id(9) });
        assert!(!grid.column(lane(1)).has_result());
    }
}
