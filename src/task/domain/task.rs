//! Task aggregate root and its creation inputs.

use super::{
    ActivityEntry, ActivityKind, ActivityLog, Actor, Attribution, Board, TaskId, TaskPriority,
    TaskStatus, UserId,
};
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Title used when a submitted title is blank.
pub const DEFAULT_TITLE: &str = "Nieuwe taak";

/// Description used when a submitted description is blank.
pub const DEFAULT_DESCRIPTION: &str = "Omschrijving ontbreekt.";

/// Reads the clock at storage precision (microseconds).
pub(crate) fn timestamp(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(6)
}

pub(crate) fn title_or_default(title: &str) -> String {
    non_blank_or(title, DEFAULT_TITLE)
}

pub(crate) fn description_or_default(description: &str) -> String {
    non_blank_or(description, DEFAULT_DESCRIPTION)
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// User a task is assigned to, with a denormalized display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// Assigned user.
    pub user_id: UserId,
    /// Display name copied at assignment time.
    pub name: String,
}

impl Assignee {
    /// Creates an assignee.
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(user_id),
            name: name.into(),
        }
    }
}

/// Form input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) status: Option<TaskStatus>,
    pub(crate) priority: Option<TaskPriority>,
    pub(crate) board: Option<Board>,
    pub(crate) assignee: Option<Assignee>,
    pub(crate) deadline: Option<NaiveDate>,
}

impl TaskDraft {
    /// Creates a draft with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status. Defaults to [`TaskStatus::Todo`].
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority. Defaults to [`TaskPriority::Medium`].
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the board. Defaults to the board the creator is viewing.
    #[must_use]
    pub const fn with_board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    /// Assigns the task.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Assignee) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) status: TaskStatus,
    pub(crate) priority: TaskPriority,
    pub(crate) board: Board,
    pub(crate) assignee: Option<Assignee>,
    pub(crate) deadline: Option<NaiveDate>,
    pub(crate) started: Option<Attribution>,
    pub(crate) picked_up: Option<Attribution>,
    pub(crate) completed: Option<Attribution>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) activities: ActivityLog,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted board.
    pub board: Board,
    /// Persisted assignee, if any.
    pub assignee: Option<Assignee>,
    /// Persisted deadline, if any.
    pub deadline: Option<NaiveDate>,
    /// Persisted first-start stamp.
    pub started: Option<Attribution>,
    /// Persisted latest pickup stamp.
    pub picked_up: Option<Attribution>,
    /// Persisted completion stamp.
    pub completed: Option<Attribution>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted activity log.
    pub activities: ActivityLog,
}

impl Task {
    /// Creates a task from submitted form input.
    ///
    /// Blank titles and descriptions fall back to [`DEFAULT_TITLE`] and
    /// [`DEFAULT_DESCRIPTION`]. The log starts with a single `created` entry
    /// attributed to `actor`.
    #[must_use]
    pub fn create(
        draft: TaskDraft,
        actor: &Actor,
        current_board: Board,
        clock: &impl Clock,
    ) -> Self {
        let now = timestamp(clock);
        let created = ActivityEntry::new(ActivityKind::Created, "task created", actor, now);

        Self {
            id: TaskId::new(),
            title: title_or_default(&draft.title),
            description: description_or_default(&draft.description),
            status: draft.status.unwrap_or(TaskStatus::Todo),
            priority: draft.priority.unwrap_or_default(),
            board: draft.board.unwrap_or(current_board),
            assignee: draft.assignee,
            deadline: draft.deadline,
            started: None,
            picked_up: None,
            completed: None,
            created_at: now,
            updated_at: now,
            activities: ActivityLog::new().append(created),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            board: data.board,
            assignee: data.assignee,
            deadline: data.deadline,
            started: data.started,
            picked_up: data.picked_up,
            completed: data.completed,
            created_at: data.created_at,
            updated_at: data.updated_at,
            activities: data.activities,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the board the task belongs to.
    #[must_use]
    pub const fn board(&self) -> Board {
        self.board
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&Assignee> {
        self.assignee.as_ref()
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    /// Returns who first started the task.
    #[must_use]
    pub const fn started(&self) -> Option<&Attribution> {
        self.started.as_ref()
    }

    /// Returns who most recently picked the task up after a pause.
    #[must_use]
    pub const fn picked_up(&self) -> Option<&Attribution> {
        self.picked_up.as_ref()
    }

    /// Returns who completed the task.
    #[must_use]
    pub const fn completed(&self) -> Option<&Attribution> {
        self.completed.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the activity log in stored order.
    #[must_use]
    pub const fn activities(&self) -> &ActivityLog {
        &self.activities
    }
}
