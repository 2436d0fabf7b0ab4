//! Core value types for race timing.
//!
//! These are the small, copyable building blocks the engine passes around:
//! - [`Lane`] is a lane number in `1..=6`, parsed from operator text
//! - [`RecordId`] identifies a split by its capture sequence number
//! - [`Place`] and [`PlaceStatus`] describe a lane's finishing place
//! - [`LapRecord`] is one captured split with its lane, place and adjusted time
//! - [`UpdateRate`] controls how often a clock display subscriber is woken
//!
//! ## Usage Example
//!
//! ```rust
//! use regatta_clock::types::{Lane, Place, PlaceStatus};
//!
//! let lane = Lane::parse("3").unwrap();
//! assert_eq!(lane.number(), 3);
//! assert!(Lane::parse(" 3 ").is_none());
//! assert!(Lane::parse("7").is_none());
//!
//! let place = Place::from(PlaceStatus::Dq);
//! assert_eq!(place.to_string(), "DQ");
//! assert!(!place.is_ranked());
//! ```

mod lane;
mod lap_record;
mod place;
mod update_rate;

pub use lane::{LANE_COUNT, Lane, RecordId};
pub use lap_record::LapRecord;
pub use place::{Place, PlaceStatus};
pub use update_rate::UpdateRate;
