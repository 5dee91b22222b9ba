//! Background refresh of the confirmed task collection.

use super::TaskLifecycleService;
use crate::task::ports::{ChangeNotifier, TaskStore, TasksChanged};
use mockable::Clock;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, MissedTickBehavior};

/// Handle to a running background refresh loop.
///
/// The loop refreshes the service whenever the notifier signals a change
/// and on a fixed interval taken from the board settings, so missed
/// signals are caught up by the next tick. Refresh failures are logged and
/// the loop carries on.
#[derive(Debug)]
pub struct BoardSync {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl BoardSync {
    /// Starts the refresh loop on the current tokio runtime.
    #[must_use]
    pub fn spawn<S, C>(
        service: Arc<TaskLifecycleService<S, C>>,
        notifier: &impl ChangeNotifier,
    ) -> Self
    where
        S: TaskStore + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let changes = notifier.subscribe();
        let handle = tokio::spawn(run(service, changes, shutdown_rx));
        Self { shutdown, handle }
    }

    /// Stops the loop and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns a [`JoinError`] when the loop panicked or was cancelled.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        if self.shutdown.send(true).is_err() {
            tracing::trace!("board sync already stopped");
        }
        self.handle.await
    }
}

async fn run<S, C>(
    service: Arc<TaskLifecycleService<S, C>>,
    subscription: broadcast::Receiver<TasksChanged>,
    mut shutdown: watch::Receiver<bool>,
) where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    let mut changes = Some(subscription);
    let mut ticker = time::interval(service.config().refresh_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            signal = next_change(&mut changes) => match signal {
                Ok(TasksChanged) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "change signals lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("change notifier closed, polling only");
                    changes = None;
                    continue;
                }
            },
            _ = ticker.tick() => {}
        }
        if service.refresh().await.is_err() {
            tracing::debug!("refresh failed, retrying on next signal");
        }
    }
    tracing::debug!("board sync stopped");
}

async fn next_change(
    changes: &mut Option<broadcast::Receiver<TasksChanged>>,
) -> Result<TasksChanged, broadcast::error::RecvError> {
    let Some(receiver) = changes else {
        return std::future::pending().await;
    };
    receiver.recv().await
}
