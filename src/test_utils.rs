//! Test utilities: regatta fixtures and pre-timed sessions
//!
//! Shared by unit tests, integration tests and the `benchmark` feature's
//! criterion benches so they all exercise the same race data.

#![cfg(any(test, feature = "benchmark"))]

use std::sync::Arc;
use std::time::Duration;

use crate::{ManualTimebase, RaceSession, RecordId, RegattaData, SessionConfig};

/// Regatta table with three race blocks, listed out of race order. Race 3 is
/// an empty block with no boats.
pub const SAMPLE_REGATTA_YAML: &str = r#"
RegattaName: Spring Sprints
Date: "2026-04-18"
Races:
  - RaceNumber: 2
    Lanes:
      1: { SchoolName: Riverside, AdditionalInfo: A }
      2: { SchoolName: Lakeside, AdditionalInfo: A }
      3: { SchoolName: Hillcrest, AdditionalInfo: B }
      4: { SchoolName: Northbank }
      5: { SchoolName: St. Aidan's, AdditionalInfo: Novice }
    RawData:
      - ["Women's 4+", "Riverside", "Lakeside", "Hillcrest", "Northbank", "St. Aidan's", ""]
      - ["Final", "A", "A", "B", "", "Novice", ""]
  - RaceNumber: 3
    RawData:
      - ["Men's 2x"]
      - ["Heat 2"]
  - RaceNumber: 1
    Lanes:
      1: { SchoolName: Lakeside, AdditionalInfo: Varsity }
      2: { SchoolName: Hillcrest, AdditionalInfo: Varsity }
      3: { SchoolName: Riverside, AdditionalInfo: JV }
      5: { SchoolName: Northbank, AdditionalInfo: Varsity }
    RawData:
      - ["Men's 8+", "Lakeside", "Hillcrest", "Riverside", "", "Northbank", ""]
      - ["Heat 1", "Varsity", "Varsity", "JV", "", "Varsity", ""]
"#;

/// [`SAMPLE_REGATTA_YAML`], parsed.
pub fn sample_regatta() -> RegattaData {
    RegattaData::from_yaml(SAMPLE_REGATTA_YAML).expect("sample regatta fixture must parse")
}

/// Finish times (elapsed from start) of a tight six-boat race.
pub const SAMPLE_FINISHES_MS: [u64; 6] = [401_200, 402_900, 403_400, 405_000, 407_800, 412_100];

/// Fresh session driven by a manual timebase.
pub fn manual_session(config: SessionConfig) -> (RaceSession, ManualTimebase) {
    let timebase = ManualTimebase::new();
    let session = RaceSession::with_timebase(config, Arc::new(timebase.clone()));
    (session, timebase)
}

/// Start, capture a split at each elapsed time in `finishes`, then stop.
///
/// Returns the session, its timebase and the finisher record ids (the start
/// marker is not included). `finishes` must be ascending.
pub fn timed_race(finishes: &[Duration]) -> (RaceSession, ManualTimebase, Vec<RecordId>) {
    let (mut session, timebase) = manual_session(SessionConfig::default());
    session.start().expect("fresh session starts");
    let mut elapsed = Duration::ZERO;
    let mut finishers = Vec::with_capacity(finishes.len());
    for &finish in finishes {
        timebase.advance(finish.saturating_sub(elapsed));
        elapsed = finish;
        finishers.push(session.lap().expect("clock is running"));
    }
    session.stop().expect("clock is running");
    (session, timebase, finishers)
}

/// [`SAMPLE_FINISHES_MS`] timed, with finisher `n` assigned to lane `n`.
pub fn assigned_race() -> (RaceSession, ManualTimebase, Vec<RecordId>) {
    let finishes: Vec<Duration> = SAMPLE_FINISHES_MS.iter().copied().map(Duration::from_millis).collect();
    let (mut session, timebase, finishers) = timed_race(&finishes);
    for (n, &id) in finishers.iter().enumerate() {
        session.assign_lane(id, &(n + 1).to_string()).expect("lanes 1-6 are free");
    }
    (session, timebase, finishers)
}
