//! Place resolution
//!
//! Places start out as the owning split's sequence number. Operators then
//! override lanes with DQ/DNF/DNS, or mark a lane "Next Place" to renumber
//! every ranked lane from scratch.

use tracing::debug;

use crate::grid::ResultsGrid;
use crate::recorder::LapRecorder;
use crate::types::{Lane, Place, PlaceStatus};

/// Apply a place status to `lane`.
///
/// A DQ closes the gap it leaves: every other lane with a higher numeric
/// place moves up by one. DNF and DNS leave the other places alone.
pub(crate) fn set_place_status(
    records: &mut LapRecorder,
    grid: &mut ResultsGrid,
    lane: Lane,
    status: PlaceStatus,
) {
    if status == PlaceStatus::NextPlace {
        grid.set_place(lane, Place::Status(status));
        if let Some(holder) = records.holder_of(lane) {
            grid.set_times(lane, Some(holder.raw_time()), holder.adjusted_time());
        }
        let ranked = renumber(records, grid);
        debug!("Lane {} marked next place, {} lanes renumbered", lane, ranked);
        return;
    }

    let old_position = grid.place(lane).and_then(Place::position);
    grid.set_place(lane, Place::Status(status));
    grid.set_times(lane, None, None);
    if let Some(holder) = records.holder_of_mut(lane) {
        holder.set_place(Place::Status(status));
    }
    debug!("Lane {} marked {}", lane, status);

    if let (PlaceStatus::Dq, Some(old_position)) = (status, old_position) {
        close_gap(records, grid, lane, old_position);
    }
}

/// Renumber ranked lanes 1, 2, 3.. in split capture order.
///
/// Only lanes held by a split take part; a lane whose place is DQ/DNF/DNS or
/// empty keeps it. Returns the number of lanes ranked. Running it twice in a
/// row gives the same places.
pub(crate) fn renumber(records: &mut LapRecorder, grid: &mut ResultsGrid) -> u32 {
    let mut next = 1;
    for record in records.iter_mut() {
        let Some(lane) = record.lane() else { continue };
        if grid.place(lane).is_some_and(Place::is_ranked) {
            let place = Place::Position(next);
            grid.set_place(lane, place);
            record.set_place(place);
            next += 1;
        }
    }
    next - 1
}

fn close_gap(records: &mut LapRecorder, grid: &mut ResultsGrid, vacated: Lane, old_position: u32) {
    for lane in Lane::all().filter(|&lane| lane != vacated) {
        let Some(position) = grid.place(lane).and_then(Place::position) else { continue };
        if position > old_position {
            let place = Place::Position(position - 1);
            grid.set_place(lane, place);
            if let Some(holder) = records.holder_of_mut(lane) {
                holder.set_place(place);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridRow;
    use crate::lanes::assign_lane;
    use crate::types::RecordId;
    use proptest::prelude::*;
    use std::time::Duration;

    fn lane(n: u8) -> Lane {
        Lane::new(n).unwrap()
    }

    /// Start marker plus five finishers, finisher `n` assigned to lane `n`.
    fn five_lane_race() -> (LapRecorder, ResultsGrid) {
        let mut records = LapRecorder::new(None);
        let mut grid = ResultsGrid::new();
        records.record(Duration::ZERO).unwrap();
        for n in 1..=5u8 {
            let id = records.record(Duration::from_secs(400 + u64::from(n))).unwrap();
            assign_lane(&mut records, &mut grid, id, &n.to_string()).unwrap();
        }
        // Places follow sequence numbers (2..=6); rank them 1..=5 first.
        renumber(&mut records, &mut grid);
        (records, grid)
    }

    fn places(grid: &ResultsGrid) -> Vec<String> {
        Lane::all().map(|lane| grid.cell(GridRow::Place, lane)).collect()
    }

    #[test]
    fn dq_closes_the_gap() {
        let (mut records, mut grid) = five_lane_race();
        assert_eq!(places(&grid), vec!["1", "2", "3", "4", "5", ""]);

        set_place_status(&mut records, &mut grid, lane(2), PlaceStatus::Dq);

        assert_eq!(places(&grid), vec!["1", "DQ", "2", "3", "4", ""]);
        assert_eq!(grid.cell(GridRow::Split, lane(2)), "");
        assert_eq!(grid.cell(GridRow::Time, lane(2)), "");
        assert_eq!(records.holder_of(lane(5)).unwrap().place(), Place::Position(4));
        assert_eq!(records.holder_of(lane(2)).unwrap().place(), Place::Status(PlaceStatus::Dq));
    }

    #[test]
    fn dnf_and_dns_leave_other_places_alone() {
        let (mut records, mut grid) = five_lane_race();
        set_place_status(&mut records, &mut grid, lane(1), PlaceStatus::Dnf);
        set_place_status(&mut records, &mut grid, lane(6), PlaceStatus::Dns);
        assert_eq!(places(&grid), vec!["DNF", "2", "3", "4", "5", "DNS"]);
    }

    #[test]
    fn next_place_rescans_in_capture_order() {
        let (mut records, mut grid) = five_lane_race();
        set_place_status(&mut records, &mut grid, lane(2), PlaceStatus::Dq);
        set_place_status(&mut records, &mut grid, lane(4), PlaceStatus::NextPlace);
        assert_eq!(places(&grid), vec!["1", "DQ", "2", "3", "4", ""]);
        assert_eq!(grid.cell(GridRow::Split, lane(4)), "06:44.0");
    }

    #[test]
    fn next_place_restores_a_disqualified_lane() {
        let (mut records, mut grid) = five_lane_race();
        set_place_status(&mut records, &mut grid, lane(2), PlaceStatus::Dq);
        set_place_status(&mut records, &mut grid, lane(2), PlaceStatus::NextPlace);
        assert_eq!(places(&grid), vec!["1", "2", "3", "4", "5", ""]);
        assert_eq!(grid.cell(GridRow::Split, lane(2)), "06:42.0");
        assert_eq!(grid.cell(GridRow::Time, lane(2)), "06:42.0");
    }

    #[test]
    fn next_place_on_an_empty_lane_keeps_the_sentinel() {
        let (mut records, mut grid) = five_lane_race();
        set_place_status(&mut records, &mut grid, lane(6), PlaceStatus::NextPlace);
        assert_eq!(grid.cell(GridRow::Place, lane(6)), "Next Place");
        assert_eq!(grid.cell(GridRow::Split, lane(6)), "");
    }

    #[test]
    fn renumbering_is_idempotent() {
        let (mut records, mut grid) = five_lane_race();
        set_place_status(&mut records, &mut grid, lane(3), PlaceStatus::Dns);
        renumber(&mut records, &mut grid);
        let first = places(&grid);
        assert_eq!(renumber(&mut records, &mut grid), 4);
        assert_eq!(places(&grid), first);
        assert_eq!(records.get(RecordId::new(5)).unwrap().place(), Place::Position(3));
    }

    proptest! {
        #[test]
        fn prop_rescan_ranks_consecutively(
            statuses in proptest::collection::vec(0u8..4, 5),
        ) {
            let (mut records, mut grid) = five_lane_race();
            for (n, status) in statuses.iter().enumerate() {
                let lane = Lane::new(n as u8 + 1).unwrap();
                let status = match status {
                    0 => PlaceStatus::Dq,
                    1 => PlaceStatus::Dnf,
                    2 => PlaceStatus::Dns,
                    _ => continue,
                };
                set_place_status(&mut records, &mut grid, lane, status);
            }
            let ranked = renumber(&mut records, &mut grid);
            let mut positions: Vec<u32> =
                Lane::all().filter_map(|lane| grid.place(lane).and_then(Place::position)).collect();
            positions.sort_unstable();
            prop_assert_eq!(positions, (1..=ranked).collect::<Vec<_>>());

            let before = places(&grid);
            renumber(&mut records, &mut grid);
            prop_assert_eq!(places(&grid), before);
        }
    }
}
