//! Background status polling for a mounted verification view.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::SessionError;
use crate::session::VerificationSession;

/// Why a poll loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollerExit {
    /// The record reached approved; nothing left to watch.
    Approved,
    /// The host stopped the poller (or dropped it).
    Stopped,
}

/// Polls `GET /profile/status` on the session's cadence until approval or
/// until stopped.
///
/// At most one loop runs per poller. Failed polls are logged and the next
/// tick proceeds as scheduled. A poll in flight when [`stop`](Self::stop) is
/// called is abandoned and its result discarded.
pub struct StatusPoller {
    session: VerificationSession,
    stop_tx: Option<broadcast::Sender<()>>,
    handle: Option<JoinHandle<PollerExit>>,
}

impl StatusPoller {
    pub fn new(session: VerificationSession) -> Self {
        Self {
            session,
            stop_tx: None,
            handle: None,
        }
    }

    /// Spawn the poll loop. Does nothing if one is already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let (stop_tx, stop_rx) = broadcast::channel(1);
        let session = self.session.clone();
        self.handle = Some(tokio::spawn(run(session, stop_rx)));
        self.stop_tx = Some(stop_tx);
        tracing::debug!(resident = %self.session.resident(), "status poller started");
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the loop and wait for it to wind down.
    pub async fn stop(&mut self) -> Option<PollerExit> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        self.join().await
    }

    /// Wait for the loop to end on its own.
    ///
    /// The stop sender stays alive until the loop has ended; dropping it
    /// earlier would read as a stop request.
    pub async fn join(&mut self) -> Option<PollerExit> {
        let handle = self.handle.take()?;
        let exit = match handle.await {
            Ok(exit) => Some(exit),
            Err(e) => {
                tracing::warn!(error = %e, "status poller task failed");
                None
            }
        };
        self.stop_tx = None;
        exit
    }
}

async fn run(session: VerificationSession, mut stop: broadcast::Receiver<()>) -> PollerExit {
    loop {
        let Some(delay) = session.next_poll_delay().await else {
            tracing::info!(resident = %session.resident(), "verification approved; polling finished");
            return PollerExit::Approved;
        };

        tokio::select! {
            biased;
            _ = stop.recv() => return PollerExit::Stopped,
            _ = tokio::time::sleep(delay) => {}
        }

        tokio::select! {
            biased;
            _ = stop.recv() => return PollerExit::Stopped,
            result = session.poll_once() => {
                if let Err(e) = result {
                    let transient = matches!(&e, SessionError::Client(c) if c.is_transient());
                    tracing::warn!(resident = %session.resident(), transient, error = %e, "status poll failed");
                }
            }
        }
    }
}
