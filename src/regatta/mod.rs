//! # Regatta Data
//!
//! The regatta table is read by an import collaborator (spreadsheet parsing
//! is not part of this crate) and handed to a session as [`RegattaData`].
//! The engine reads race numbers, lane entries and the raw text block; it
//! never writes back except for a race's `approved` flag.
//!
//! Data can be built in code or deserialized. YAML with PascalCase keys is
//! the interchange format:
//!
//! ```rust
//! use regatta_clock::RegattaData;
//!
//! let yaml = r#"
//! RegattaName: Spring Sprints
//! Date: 2026-04-18
//! Races:
//!   - RaceNumber: 2
//!     Lanes:
//!       1: { SchoolName: Lakeside, AdditionalInfo: A }
//!       3: { SchoolName: Hillcrest }
//!     RawData:
//!       - ["Women's 4+"]
//!       - ["Final"]
//! "#;
//!
//! let regatta = RegattaData::from_yaml(yaml).unwrap();
//! let race = regatta.race(2).unwrap();
//! assert_eq!(race.title(), "Race 2 (2 Boats) - Women's 4+ - Final");
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::LANE_COUNT;
use crate::{Result, TimingError};

pub mod race;

pub use race::{LaneEntry, RaceData};

/// Regatta-wide schedule
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct RegattaData {
    /// Regatta name from the table title
    pub regatta_name: String,
    /// Regatta date as printed in the table title
    pub date: String,
    /// Races, sorted by race number
    pub races: Vec<RaceData>,
}

impl RegattaData {
    /// Build regatta data, sorting races by number.
    pub fn new(regatta_name: impl Into<String>, date: impl Into<String>, races: Vec<RaceData>) -> Self {
        let mut data = Self { regatta_name: regatta_name.into(), date: date.into(), races };
        data.normalize();
        data
    }

    /// Parse YAML interchange data.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut data: RegattaData = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TimingError::parse_error("RegattaData deserialization", e))?;
        data.normalize();
        debug!(
            "Parsed regatta '{}': {} races, {} scheduled",
            data.regatta_name,
            data.races.len(),
            data.scheduled_races()
        );
        Ok(data)
    }

    pub fn race(&self, race_number: u32) -> Option<&RaceData> {
        self.races.iter().find(|race| race.race_number == race_number)
    }

    pub(crate) fn race_mut(&mut self, race_number: u32) -> Option<&mut RaceData> {
        self.races.iter_mut().find(|race| race.race_number == race_number)
    }

    /// Races with at least one lane entry.
    pub fn scheduled_races(&self) -> usize {
        self.races.iter().filter(|race| race.is_scheduled()).count()
    }

    /// Sort races and drop lane keys outside 1-6.
    fn normalize(&mut self) {
        self.races.sort_by_key(|race| race.race_number);
        for race in &mut self.races {
            let race_number = race.race_number;
            race.lanes.retain(|&lane, _| {
                let valid = (1..=LANE_COUNT as u8).contains(&lane);
                if !valid {
                    warn!("Ignoring lane {} in race {}", lane, race_number);
                }
                valid
            });
        }
    }
}
