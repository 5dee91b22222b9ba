//! Error types for task lifecycle validation and parsing.

use super::{TaskAction, TaskId, TaskStatus, UserId};
use thiserror::Error;

/// Errors returned when a lifecycle operation is rejected.
///
/// A rejected operation never changes the task it was invoked on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The action is not legal from the task's current status.
    #[error("cannot {action} task {task_id} while it is {status}")]
    IllegalTransition {
        /// Task the action was invoked on.
        task_id: TaskId,
        /// Attempted action.
        action: TaskAction,
        /// Status the task was in.
        status: TaskStatus,
    },

    /// Only managers may delete tasks.
    #[error("user {user_id} is not a manager and may not delete task {task_id}")]
    NotAManager {
        /// Task the deletion was requested for.
        task_id: TaskId,
        /// User who requested it.
        user_id: UserId,
    },

    /// Task deletion is switched off for this store.
    #[error("task deletion is disabled")]
    DeletionDisabled,

    /// A completion confirmation was presented for a different task.
    #[error("completion was requested for task {requested} but confirmed for task {confirmed}")]
    CompletionTaskMismatch {
        /// Task the confirmation token was issued for.
        requested: TaskId,
        /// Task the confirmation was applied to.
        confirmed: TaskId,
    },
}

/// Error returned while strictly parsing a task status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while strictly parsing a task priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while strictly parsing a board name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown board: {0}")]
pub struct ParseBoardError(pub String);

/// Error returned while strictly parsing a user role.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);
