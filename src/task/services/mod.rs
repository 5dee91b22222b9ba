//! Application services for the board's task lifecycle.

mod lifecycle;
mod sync;

pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
pub use sync::BoardSync;
