//! Domain model for the task lifecycle.
//!
//! Everything in this module is pure: no I/O, no global state, and the
//! acting user and clock are always passed in explicitly.

mod activity;
mod actor;
mod attribution;
mod error;
mod ids;
mod projection;
mod record;
mod status;
mod task;
mod transition;

pub use activity::{ActivityEntry, ActivityKind, ActivityLog, PersistedActivityData};
pub use actor::{Actor, UserId, UserRole};
pub use attribution::{
    Attribution, ResolvedAttribution, resolve_completer, resolve_creator, resolve_picker,
    resolve_starter,
};
pub use error::{
    ParseBoardError, ParsePriorityError, ParseTaskStatusError, ParseUserRoleError, TaskDomainError,
};
pub use ids::{ActivityId, TaskId};
pub use projection::{
    BOARD_COLUMNS, BoardColumn, BoardView, StatusCounts, counts_by_status, is_due_soon, is_overdue,
    tasks_for_board, tasks_for_status,
};
pub use record::{TaskRecord, activity_log_from_json, format_timestamp};
pub use status::{Board, TaskPriority, TaskStatus};
pub(crate) use task::title_or_default;
pub use task::{Assignee, DEFAULT_DESCRIPTION, DEFAULT_TITLE, PersistedTaskData, Task, TaskDraft};
pub use transition::{PendingCompletion, TaskAction, TaskEdit};
