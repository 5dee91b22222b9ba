//! Change notification port.

use tokio::sync::broadcast;

/// Coarse signal that the stored task collection changed and should be
/// fetched again. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TasksChanged;

/// Source of [`TasksChanged`] signals.
///
/// Subscribers may miss signals (a lagging receiver, a dropped connection),
/// so consumers pair a subscription with periodic refreshes.
pub trait ChangeNotifier: Send + Sync {
    /// Opens a new subscription.
    fn subscribe(&self) -> broadcast::Receiver<TasksChanged>;
}
