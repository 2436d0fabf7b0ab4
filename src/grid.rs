//! Six-lane results grid
//!
//! The grid is the canonical race output: one column per lane, five rows.
//!
//! | row             | written by                                   |
//! |-----------------|----------------------------------------------|
//! | School name     | race loading only                            |
//! | Additional info | race loading only                            |
//! | Place           | lane assignment, place resolution            |
//! | Split           | lane assignment, split edits                 |
//! | Time            | lane assignment, time adjustment             |
//!
//! Result cells are only mutated from inside the crate; the UI reads
//! them through the accessors and [`GridSnapshot`].

use serde::Serialize;
use std::time::Duration;

use crate::regatta::RaceData;
use crate::time_codec::format_time;
use crate::types::{LANE_COUNT, Lane, Place};

/// Rows of the results grid, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum GridRow {
    SchoolName,
    AdditionalInfo,
    Place,
    Split,
    Time,
}

impl GridRow {
    pub const ALL: [GridRow; 5] =
        [GridRow::SchoolName, GridRow::AdditionalInfo, GridRow::Place, GridRow::Split, GridRow::Time];
}

/// One lane's column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneColumn {
    school_name: String,
    additional_info: String,
    place: Option<Place>,
    split: Option<Duration>,
    time: Option<Duration>,
}

impl LaneColumn {
    pub fn school_name(&self) -> &str {
        &self.school_name
    }

    pub fn additional_info(&self) -> &str {
        &self.additional_info
    }

    pub fn place(&self) -> Option<Place> {
        self.place
    }

    pub fn split(&self) -> Option<Duration> {
        self.split
    }

    pub fn time(&self) -> Option<Duration> {
        self.time
    }

    /// Whether any of the place/split/time cells is filled.
    pub fn has_result(&self) -> bool {
        self.place.is_some() || self.split.is_some() || self.time.is_some()
    }
}

/// The per-lane results table for one race.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsGrid {
    columns: [LaneColumn; LANE_COUNT],
    boat_class: String,
    flight: String,
}

impl ResultsGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(&self, lane: Lane) -> &LaneColumn {
        &self.columns[lane.index()]
    }

    pub fn place(&self, lane: Lane) -> Option<Place> {
        self.column(lane).place
    }

    pub fn split(&self, lane: Lane) -> Option<Duration> {
        self.column(lane).split
    }

    pub fn time(&self, lane: Lane) -> Option<Duration> {
        self.column(lane).time
    }

    /// Label shown in the leftmost column for `row`.
    pub fn row_label(&self, row: GridRow) -> &str {
        match row {
            GridRow::SchoolName => self.boat_class.as_str(),
            GridRow::AdditionalInfo => self.flight.as_str(),
            GridRow::Place => "Place",
            GridRow::Split => "Split",
            GridRow::Time => "Time",
        }
    }

    /// Text of one cell as the UI shows it.
    pub fn cell(&self, row: GridRow, lane: Lane) -> String {
        let column = self.column(lane);
        match row {
            GridRow::SchoolName => column.school_name.clone(),
            GridRow::AdditionalInfo => column.additional_info.clone(),
            GridRow::Place => column.place.map(|p| p.to_string()).unwrap_or_default(),
            GridRow::Split => column.split.map(format_time).unwrap_or_default(),
            GridRow::Time => column.time.map(format_time).unwrap_or_default(),
        }
    }

    /// Header row: an empty label cell followed by `Lane 1` .. `Lane 6`.
    pub fn headers() -> Vec<String> {
        std::iter::once(String::new()).chain(Lane::all().map(Lane::header)).collect()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let rows = GridRow::ALL
            .iter()
            .map(|&row| {
                std::iter::once(self.row_label(row).to_string())
                    .chain(Lane::all().map(|lane| self.cell(row, lane)))
                    .collect()
            })
            .collect();
        GridSnapshot { headers: Self::headers(), rows }
    }

    /// Rows for the referee approval sheet.
    ///
    /// Numerically placed lanes come first in place order, followed by
    /// DQ/DNF/DNS lanes in lane order. Empty and "Next Place" lanes are left
    /// out.
    pub fn approval_rows(&self) -> Vec<ApprovalRow> {
        let mut ranked: Vec<(u32, Lane)> = Lane::all()
            .filter_map(|lane| self.place(lane).and_then(Place::position).map(|p| (p, lane)))
            .collect();
        ranked.sort();

        let unranked = Lane::all().filter(|&lane| self.place(lane).is_some_and(|p| !p.is_ranked()));

        ranked
            .into_iter()
            .map(|(_, lane)| lane)
            .chain(unranked)
            .filter_map(|lane| {
                let place = self.place(lane)?;
                Some(ApprovalRow {
                    lane,
                    place: place.to_string(),
                    split: self.cell(GridRow::Split, lane),
                    time: self.cell(GridRow::Time, lane),
                    school: self.column(lane).school_name.clone(),
                })
            })
            .collect()
    }

    pub(crate) fn write_result(
        &mut self,
        lane: Lane,
        place: Place,
        split: Duration,
        time: Option<Duration>,
    ) {
        let column = &mut self.columns[lane.index()];
        column.place = Some(place);
        column.split = Some(split);
        column.time = time;
    }

    pub(crate) fn set_place(&mut self, lane: Lane, place: Place) {
        self.columns[lane.index()].place = Some(place);
    }

    pub(crate) fn set_times(&mut self, lane: Lane, split: Option<Duration>, time: Option<Duration>) {
        let column = &mut self.columns[lane.index()];
        column.split = split;
        column.time = time;
    }

    pub(crate) fn set_time(&mut self, lane: Lane, time: Option<Duration>) {
        self.columns[lane.index()].time = time;
    }

    pub(crate) fn clear_result(&mut self, lane: Lane) {
        self.set_times(lane, None, None);
        self.columns[lane.index()].place = None;
    }

    pub(crate) fn clear_results(&mut self) {
        for lane in Lane::all() {
            self.clear_result(lane);
        }
    }

    /// Blank the school and info rows and their labels.
    pub(crate) fn clear_metadata(&mut self) {
        for column in &mut self.columns {
            column.school_name.clear();
            column.additional_info.clear();
        }
        self.boat_class.clear();
        self.flight.clear();
    }

    /// Fill the school and info rows from a scheduled race.
    ///
    /// Lanes without an entry are blanked. Result cells are left alone.
    pub(crate) fn seed(&mut self, race: &RaceData) {
        for lane in Lane::all() {
            let column = &mut self.columns[lane.index()];
            match race.entry(lane) {
                Some(entry) => {
                    column.school_name.clone_from(&entry.school_name);
                    column.additional_info.clone_from(&entry.additional_info);
                }
                None => {
                    column.school_name.clear();
                    column.additional_info.clear();
                }
            }
        }
        self.boat_class = race.boat_class().unwrap_or_default().to_string();
        self.flight = race.flight().unwrap_or_default().to_string();
    }
}

/// String rendering of the grid: headers plus five labelled rows of seven cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct GridSnapshot {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One line of the referee approval sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ApprovalRow {
    pub lane: Lane,
    pub place: String,
    pub split: String,
    pub time: String,
    pub school: String,
}
