// ABOUTME: Cancellable delayed session transitions
// Replaces fire-and-forget timers: scheduling a new transition aborts the pending one

use crate::host::StatusIndicator;
use crate::models::{ServerSession, ServerStatus, SessionEvent};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct TransitionScheduler {
    pending: Option<JoinHandle<()>>,
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` after `delay`, aborting whatever was scheduled before.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Aborts the pending transition. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                debug!("Cancelled pending session transition");
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TransitionScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Settles the session out of `from` and updates the indicator to match.
/// Does nothing if the session has already moved on.
pub async fn settle(
    session: Arc<Mutex<ServerSession>>,
    from: ServerStatus,
    status: Arc<dyn StatusIndicator>,
    port: u16,
) {
    let mut session = session.lock().await;
    if session.status() != from {
        debug!(
            "Skipping stale settle from {} (session is {})",
            from,
            session.status()
        );
        return;
    }

    match session.apply(SessionEvent::Settled) {
        Ok(ServerStatus::Running) => {
            info!("Development server assumed up on port {}", port);
            status.set_offline(port);
        }
        Ok(ServerStatus::Stopped) => {
            info!("Development server assumed down");
            status.set_online();
        }
        Ok(other) => warn!("Unexpected settled status {}", other),
        Err(e) => warn!("Settle rejected: {}", e),
    }
}
