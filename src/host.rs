//! Single-owner session host
//!
//! [`SessionHost::spawn`] moves a [`RaceSession`] into one tokio task. Every
//! caller goes through a cloneable [`SessionHandle`]: commands are queued on
//! an mpsc channel and answered over a oneshot, so no two commands ever
//! interleave. After each command the task republishes a snapshot.

use futures::Stream;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clock::RunState;
use crate::session::{CommandOutcome, RaceSession, SessionCommand, SessionSnapshot};
use crate::ticker::{ClockTicker, DisplayFeed};
use crate::timebase::Timebase;
use crate::types::UpdateRate;
use crate::{Result, TimingError};

const COMMAND_QUEUE: usize = 32;

type Reply = oneshot::Sender<Result<CommandOutcome>>;

/// Spawns the owner task for a session.
pub struct SessionHost;

impl SessionHost {
    /// Move `session` into its owner task.
    ///
    /// Must be called inside a tokio runtime. The task ends when every
    /// handle is dropped or [`SessionHandle::shutdown`] is called.
    pub fn spawn(session: RaceSession) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(session.snapshot()));
        let cancel = CancellationToken::new();

        let display = DisplaySource {
            run_state: session.run_state(),
            timebase: session.timebase(),
            tick_hz: session.config().tick_hz,
            rate: session.config().display_rate,
        };

        tokio::spawn(Self::owner_task(session, command_rx, snapshot_tx, cancel.clone()));

        SessionHandle { commands: command_tx, snapshots: snapshot_rx, display, cancel }
    }

    async fn owner_task(
        mut session: RaceSession,
        mut commands: mpsc::Receiver<(SessionCommand, Reply)>,
        snapshots: watch::Sender<Arc<SessionSnapshot>>,
        cancel: CancellationToken,
    ) {
        info!("Session owner task started");
        let mut applied = 0u64;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Session owner task cancelled");
                    break;
                }
                next = commands.recv() => next,
            };

            let Some((command, reply)) = next else {
                debug!("All session handles dropped");
                break;
            };

            let name = command.name();
            let result = session.apply(command);
            if let Err(e) = &result {
                warn!("Command {} rejected: {}", name, e);
            }
            applied += 1;
            snapshots.send_replace(Arc::new(session.snapshot()));

            if reply.send(result).is_err() {
                debug!("Caller for {} went away before the reply", name);
            }
        }

        info!("Session owner task ended after {} commands", applied);
    }
}

/// What a handle needs to start its own display ticker.
#[derive(Clone)]
struct DisplaySource {
    run_state: watch::Receiver<RunState>,
    timebase: Arc<dyn Timebase>,
    tick_hz: u32,
    rate: UpdateRate,
}

/// Cloneable access to a hosted session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<(SessionCommand, Reply)>,
    snapshots: watch::Receiver<Arc<SessionSnapshot>>,
    display: DisplaySource,
    cancel: CancellationToken,
}

impl SessionHandle {
    /// Queue a command and wait for its result.
    ///
    /// Fails with [`TimingError::SessionClosed`] once the owner task is gone.
    pub async fn send(&self, command: SessionCommand) -> Result<CommandOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands.send((command, reply_tx)).await.map_err(|_| TimingError::SessionClosed)?;
        reply_rx.await.map_err(|_| TimingError::SessionClosed)?
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Snapshots as they are published, starting with the current one.
    pub fn snapshots(&self) -> impl Stream<Item = Arc<SessionSnapshot>> + 'static {
        WatchStream::new(self.snapshots.clone())
    }

    /// Start a display ticker for the hosted session.
    pub fn display_feed(&self) -> DisplayFeed {
        let source = self.display.clone();
        ClockTicker::spawn(source.run_state, source.timebase, source.tick_hz, source.rate)
    }

    /// Stop the owner task. Queued commands are dropped unanswered.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockPhase;
    use crate::test_utils::{manual_session, sample_regatta};
    use crate::types::RecordId;
    use crate::SessionConfig;
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn commands_are_applied_in_order() -> anyhow::Result<()> {
        let (session, timebase) = manual_session(SessionConfig::default());
        let handle = SessionHost::spawn(session);

        assert_eq!(handle.send(SessionCommand::Start).await?, CommandOutcome::Recorded(RecordId::new(1)));
        timebase.advance(Duration::from_millis(401_200));
        assert_eq!(handle.send(SessionCommand::Lap).await?, CommandOutcome::Recorded(RecordId::new(2)));
        handle.send(SessionCommand::Stop).await?;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, ClockPhase::Stopped);
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[1].split, "06:41.2");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_commands_come_back_as_errors() -> anyhow::Result<()> {
        let (session, _timebase) = manual_session(SessionConfig::default());
        let handle = SessionHost::spawn(session);

        let err = handle.send(SessionCommand::LoadRace { race_number: 1 }).await.unwrap_err();
        assert_eq!(err, TimingError::NoRegattaData);

        handle.send(SessionCommand::LoadRaceData { regatta: sample_regatta() }).await?;
        handle.send(SessionCommand::LoadRace { race_number: 1 }).await?;
        assert_eq!(handle.snapshot().race_number, Some(1));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn snapshots_stream_follows_commands() -> anyhow::Result<()> {
        let (session, _timebase) = manual_session(SessionConfig::default());
        let handle = SessionHost::spawn(session);
        let mut snapshots = handle.snapshots();

        let first = snapshots.next().await.expect("initial snapshot");
        assert_eq!(first.phase, ClockPhase::Cleared);

        handle.send(SessionCommand::Start).await?;
        let next = snapshots.next().await.expect("snapshot after start");
        assert_eq!(next.phase, ClockPhase::Running);
        assert!(!next.inputs_enabled);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_the_session() {
        let (session, _timebase) = manual_session(SessionConfig::default());
        let handle = SessionHost::spawn(session);
        handle.shutdown();
        tokio::task::yield_now().await;

        assert_eq!(handle.send(SessionCommand::Start).await, Err(TimingError::SessionClosed));
        assert!(handle.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn display_feed_tracks_the_hosted_clock() -> anyhow::Result<()> {
        let (session, timebase) = manual_session(SessionConfig::default());
        let handle = SessionHost::spawn(session);
        let feed = handle.display_feed();
        assert_eq!(feed.current(), "00:00.0");

        handle.send(SessionCommand::Start).await?;
        timebase.advance(Duration::from_millis(12_300));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(feed.current(), "00:12.3");

        handle.send(SessionCommand::Stop).await?;
        timebase.advance(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(feed.current(), "00:12.3");
        Ok(())
    }
}
