//! Clock display ticker
//!
//! The ticker turns the published [`RunState`] into display text on a fixed
//! period. It only ever sees the run state and a [`Timebase`]; split records
//! and the results grid stay with the session that owns them.

use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::clock::RunState;
use crate::stream::ThrottleExt;
use crate::timebase::Timebase;
use crate::types::UpdateRate;

/// Spawns the display tick task.
pub struct ClockTicker;

impl ClockTicker {
    /// Spawn a tick task watching `run_state`.
    ///
    /// The task recomputes the display every `1 / tick_hz` seconds and as
    /// soon as the run state changes. It ends when the returned feed is
    /// dropped or the run state sender goes away.
    pub fn spawn(
        run_state: watch::Receiver<RunState>,
        timebase: Arc<dyn Timebase>,
        tick_hz: u32,
        rate: UpdateRate,
    ) -> DisplayFeed {
        let tick_hz = tick_hz.max(1);
        let initial = run_state.borrow().display_at(timebase.now());
        let (display_tx, display_rx) = watch::channel(initial);
        let cancel = CancellationToken::new();

        let period = Duration::from_secs(1) / tick_hz;
        tokio::spawn(Self::tick_task(run_state, timebase, period, display_tx, cancel.clone()));

        DisplayFeed { display: display_rx, tick_hz, rate: rate.normalize(tick_hz), cancel }
    }

    async fn tick_task(
        mut run_state: watch::Receiver<RunState>,
        timebase: Arc<dyn Timebase>,
        period: Duration,
        display_tx: watch::Sender<String>,
        cancel: CancellationToken,
    ) {
        info!("Clock ticker started ({:?} period)", period);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Clock ticker cancelled");
                    break;
                }
                changed = run_state.changed() => {
                    if changed.is_err() {
                        debug!("Run state sender dropped, stopping ticker");
                        break;
                    }
                }
                _ = interval.tick() => ticks += 1,
            }

            let text = run_state.borrow_and_update().display_at(timebase.now());
            let updated = display_tx.send_if_modified(|current| {
                if *current == text {
                    return false;
                }
                trace!("Clock display {}", text);
                *current = text;
                true
            });
            if !updated && display_tx.is_closed() {
                debug!("Display receivers dropped, stopping ticker");
                break;
            }
        }

        info!("Clock ticker ended after {} ticks", ticks);
    }
}

/// Live clock display text for one session.
///
/// Dropping the feed stops its tick task; streams taken from it stop
/// receiving updates at that point.
pub struct DisplayFeed {
    display: watch::Receiver<String>,
    tick_hz: u32,
    rate: UpdateRate,
    cancel: CancellationToken,
}

impl DisplayFeed {
    /// Current display text, e.g. `"03:12.4"`.
    pub fn current(&self) -> String {
        self.display.borrow().clone()
    }

    /// Display updates at the configured default rate.
    pub fn updates(&self) -> impl Stream<Item = String> + 'static {
        self.updates_at(self.rate)
    }

    /// Display updates at `rate`; starts with the current text.
    pub fn updates_at(&self, rate: UpdateRate) -> impl Stream<Item = String> + 'static {
        let display = WatchStream::new(self.display.clone());
        match rate.throttle_interval(self.tick_hz) {
            None => display.boxed(),
            Some(interval) => display.throttle(interval).boxed(),
        }
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }
}

impl Drop for DisplayFeed {
    fn drop(&mut self) {
        debug!("Dropping display feed");
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timebase::ManualTimebase;
    use std::time::Instant;

    fn spawn_with(state: RunState, timebase: &ManualTimebase) -> (watch::Sender<RunState>, DisplayFeed) {
        let (state_tx, state_rx) = watch::channel(state);
        let feed = ClockTicker::spawn(state_rx, Arc::new(timebase.clone()), 10, UpdateRate::Native);
        (state_tx, feed)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn cleared_clock_shows_zero() {
        let timebase = ManualTimebase::new();
        let (_state, feed) = spawn_with(RunState::Cleared, &timebase);
        assert_eq!(feed.current(), "00:00.0");
    }

    #[tokio::test(start_paused = true)]
    async fn running_clock_follows_the_timebase() {
        let timebase = ManualTimebase::new();
        let (_state, feed) = spawn_with(RunState::Running { started: timebase.now() }, &timebase);

        timebase.advance(Duration::from_millis(65_300));
        settle().await;
        assert_eq!(feed.current(), "01:05.3");
    }

    #[tokio::test(start_paused = true)]
    async fn state_changes_publish_without_waiting_for_a_tick() {
        let timebase = ManualTimebase::new();
        let (state, feed) = spawn_with(RunState::Cleared, &timebase);
        state.send_replace(RunState::Stopped { elapsed: Duration::from_millis(401_200) });
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(feed.current(), "06:41.2");
    }

    #[tokio::test(start_paused = true)]
    async fn updates_stream_starts_with_current_text() {
        let timebase = ManualTimebase::new();
        let started: Instant = timebase.now();
        let (_state, feed) = spawn_with(RunState::Running { started }, &timebase);
        let mut updates = feed.updates();
        assert_eq!(updates.next().await.as_deref(), Some("00:00.0"));

        timebase.advance(Duration::from_secs(2));
        assert_eq!(updates.next().await.as_deref(), Some("00:02.0"));
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_stops_when_the_run_state_goes_away() {
        let timebase = ManualTimebase::new();
        let (state, feed) = spawn_with(RunState::Cleared, &timebase);
        let mut updates = feed.updates();
        assert!(updates.next().await.is_some());
        drop(state);
        settle().await;
        // Sender side of the display channel is gone once the task exits.
        assert_eq!(updates.next().await, None);
    }
}
