//! Read-side projections over a task collection.
//!
//! Nothing here mutates a task; every function derives a view from the
//! tasks it is given.

use super::{Board, Task, TaskId, TaskStatus};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Column order of a board.
pub const BOARD_COLUMNS: [TaskStatus; 4] = [
    TaskStatus::Todo,
    TaskStatus::InProgress,
    TaskStatus::NeedsPickup,
    TaskStatus::Completed,
];

/// Returns the tasks that belong to `board`.
pub fn tasks_for_board<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    board: Board,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| task.board() == board)
        .collect()
}

/// Returns the tasks whose status is `status`.
pub fn tasks_for_status<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    status: TaskStatus,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| task.status() == status)
        .collect()
}

/// Number of tasks per status. Every status is present, possibly as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCounts(BTreeMap<TaskStatus, usize>);

impl StatusCounts {
    /// Returns the count for `status`.
    #[must_use]
    pub fn get(&self, status: TaskStatus) -> usize {
        self.0.get(&status).copied().unwrap_or_default()
    }

    /// Returns the number of tasks counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Iterates `(status, count)` pairs in status order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, usize)> + '_ {
        self.0.iter().map(|(status, count)| (*status, *count))
    }
}

/// Counts tasks per status, for tab badges.
pub fn counts_by_status<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> StatusCounts {
    let mut counts: BTreeMap<TaskStatus, usize> =
        TaskStatus::ALL.into_iter().map(|status| (status, 0)).collect();
    for task in tasks {
        *counts.entry(task.status()).or_default() += 1;
    }
    StatusCounts(counts)
}

/// Start of the deadline day in UTC, which is when a task becomes overdue.
fn deadline_instant(deadline: NaiveDate) -> DateTime<Utc> {
    deadline.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Returns `true` when the deadline has passed and the task is not completed.
#[must_use]
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.status() != TaskStatus::Completed
        && task
            .deadline()
            .is_some_and(|deadline| deadline_instant(deadline) < now)
}

/// Returns `true` when an open task's deadline falls within the next
/// `warning_days` days. Overdue tasks are not "due soon".
#[must_use]
pub fn is_due_soon(task: &Task, now: DateTime<Utc>, warning_days: u32) -> bool {
    if task.status() == TaskStatus::Completed || is_overdue(task, now) {
        return false;
    }
    let Some(deadline) = task.deadline() else {
        return false;
    };
    now.checked_add_days(Days::new(u64::from(warning_days)))
        .is_some_and(|horizon| deadline_instant(deadline) <= horizon)
}

/// One column of a board view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    /// Status shown in this column.
    pub status: TaskStatus,
    /// Tasks in the column, newest first.
    pub tasks: Vec<Task>,
}

/// Everything needed to render one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Board being shown.
    pub board: Board,
    /// Columns in [`BOARD_COLUMNS`] order.
    pub columns: Vec<BoardColumn>,
    /// Task counts per status.
    pub counts: StatusCounts,
    /// Tasks past their deadline.
    pub overdue: Vec<TaskId>,
    /// Open tasks whose deadline is near.
    pub due_soon: Vec<TaskId>,
}

impl BoardView {
    /// Builds the view of `board` from the full task collection.
    #[must_use]
    pub fn build(tasks: &[Task], board: Board, now: DateTime<Utc>, warning_days: u32) -> Self {
        let mut board_tasks = tasks_for_board(tasks, board);
        board_tasks.sort_by(|left, right| right.created_at().cmp(&left.created_at()));

        let columns = BOARD_COLUMNS
            .into_iter()
            .map(|status| BoardColumn {
                status,
                tasks: tasks_for_status(board_tasks.iter().copied(), status)
                    .into_iter()
                    .cloned()
                    .collect(),
            })
            .collect();

        Self {
            board,
            columns,
            counts: counts_by_status(board_tasks.iter().copied()),
            overdue: board_tasks
                .iter()
                .filter(|task| is_overdue(task, now))
                .map(|task| task.id())
                .collect(),
            due_soon: board_tasks
                .iter()
                .filter(|task| is_due_soon(task, now, warning_days))
                .map(|task| task.id())
                .collect(),
        }
    }

    /// Returns the column for `status`.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|column| column.status == status)
    }
}
