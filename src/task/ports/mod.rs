//! Port contracts for the task lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod notifier;
pub mod store;

pub use notifier::{ChangeNotifier, TasksChanged};
pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
