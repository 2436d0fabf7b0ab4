//! Finishing places and place-override statuses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operator override for a lane's place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PlaceStatus {
    /// Disqualified
    #[serde(rename = "DQ")]
    Dq,
    /// Did not finish
    #[serde(rename = "DNF")]
    Dnf,
    /// Did not start
    #[serde(rename = "DNS")]
    Dns,
    /// Placeholder that triggers a full renumbering of ranked lanes
    #[serde(rename = "Next Place")]
    NextPlace,
}

impl PlaceStatus {
    /// Statuses offered to the operator, in menu order.
    pub const ALL: [PlaceStatus; 4] =
        [PlaceStatus::Dns, PlaceStatus::Dnf, PlaceStatus::Dq, PlaceStatus::NextPlace];

    pub fn label(self) -> &'static str {
        match self {
            PlaceStatus::Dq => "DQ",
            PlaceStatus::Dnf => "DNF",
            PlaceStatus::Dns => "DNS",
            PlaceStatus::NextPlace => "Next Place",
        }
    }

    /// DQ, DNF and DNS carry no rank and no time.
    pub fn is_unranked(self) -> bool {
        !matches!(self, PlaceStatus::NextPlace)
    }
}

impl fmt::Display for PlaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlaceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlaceStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown place status '{}'", s))
    }
}

/// Place shown for a lane: a numeric rank or a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Place {
    Position(u32),
    Status(PlaceStatus),
}

impl Place {
    pub fn position(self) -> Option<u32> {
        match self {
            Place::Position(p) => Some(p),
            Place::Status(_) => None,
        }
    }

    /// Whether the renumbering rescan gives this place a number.
    pub fn is_ranked(self) -> bool {
        match self {
            Place::Position(_) => true,
            Place::Status(status) => !status.is_unranked(),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Position(p) => write!(f, "{}", p),
            Place::Status(status) => f.write_str(status.label()),
        }
    }
}

impl From<PlaceStatus> for Place {
    fn from(status: PlaceStatus) -> Self {
        Place::Status(status)
    }
}
