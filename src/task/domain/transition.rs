//! Task lifecycle state machine.
//!
//! ```text
//! todo --start--> in-progress --pause--> needs-pickup --start--> in-progress
//!                 in-progress --complete--> completed --delete--> (removed)
//! ```
//!
//! Every operation is a pure function of the current task, the acting user
//! and the clock. It returns the next task (or an error) and never mutates
//! its input, so a rejected action leaves the caller's task untouched.

use super::task::{description_or_default, timestamp, title_or_default};
use super::{
    ActivityEntry, ActivityKind, Actor, Assignee, Attribution, Board, Task, TaskDomainError, TaskId,
    TaskPriority, TaskStatus,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User-triggered lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskAction {
    /// Start a todo task or pick up a paused one.
    Start,
    /// Pause a task in progress so someone else can pick it up.
    Pause,
    /// Ask for confirmation before completing.
    RequestComplete,
    /// Complete a task in progress.
    Complete,
    /// Change the task's descriptive fields.
    Edit,
    /// Remove a completed task.
    Delete,
}

impl TaskAction {
    /// Every action.
    pub const ALL: [Self; 6] = [
        Self::Start,
        Self::Pause,
        Self::RequestComplete,
        Self::Complete,
        Self::Edit,
        Self::Delete,
    ];

    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::RequestComplete => "request-complete",
            Self::Complete => "complete",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Returns `true` when the action may be invoked on a task in `status`.
    #[must_use]
    pub const fn is_allowed_from(self, status: TaskStatus) -> bool {
        match self {
            Self::Start => matches!(status, TaskStatus::Todo | TaskStatus::NeedsPickup),
            Self::Pause | Self::RequestComplete | Self::Complete => {
                matches!(status, TaskStatus::InProgress)
            }
            Self::Edit => true,
            Self::Delete => matches!(status, TaskStatus::Completed),
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confirmation token issued by [`Task::request_complete`].
///
/// Completion is a two-step interaction: the token is handed to the user
/// interface, which asks for confirmation and then presents it back.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a completion request does nothing until it is confirmed"]
pub struct PendingCompletion {
    task_id: TaskId,
    actor: Actor,
    observed_updated_at: DateTime<Utc>,
}

impl PendingCompletion {
    /// Returns the task the request was made for.
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the user who asked to complete the task.
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Returns the task version the request was made against.
    pub const fn observed_updated_at(&self) -> DateTime<Utc> {
        self.observed_updated_at
    }
}

/// Form input for editing a task. Unset fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskEdit {
    title: Option<String>,
    description: Option<String>,
    priority: Option<TaskPriority>,
    board: Option<Board>,
    assignee: Option<Option<Assignee>>,
    deadline: Option<Option<NaiveDate>>,
}

impl TaskEdit {
    /// Creates an edit that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title. Blank titles fall back to the default title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description. Blank descriptions fall back to the default.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Moves the task to another board.
    #[must_use]
    pub const fn with_board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    /// Assigns the task.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Assignee) -> Self {
        self.assignee = Some(Some(assignee));
        self
    }

    /// Removes the assignment.
    #[must_use]
    pub fn without_assignee(mut self) -> Self {
        self.assignee = Some(None);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(Some(deadline));
        self
    }

    /// Removes the deadline.
    #[must_use]
    pub const fn without_deadline(mut self) -> Self {
        self.deadline = Some(None);
        self
    }
}

impl Task {
    /// Returns the actions `actor` may invoke on this task right now.
    ///
    /// [`TaskAction::Complete`] is never listed; it is reached through
    /// [`TaskAction::RequestComplete`].
    #[must_use]
    pub fn available_actions(&self, actor: &Actor) -> Vec<TaskAction> {
        TaskAction::ALL
            .into_iter()
            .filter(|action| *action != TaskAction::Complete)
            .filter(|action| action.is_allowed_from(self.status))
            .filter(|action| *action != TaskAction::Delete || actor.is_manager())
            .collect()
    }

    /// Starts a todo task or picks up a paused one.
    ///
    /// A pickup (from needs-pickup) always re-stamps the pickup attribution
    /// with `actor`. A first start (from todo) stamps the start attribution
    /// only when none is recorded yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IllegalTransition`] unless the task is todo
    /// or needs-pickup.
    pub fn start(&self, actor: &Actor, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        self.ensure_allowed(TaskAction::Start)?;
        let now = timestamp(clock);
        let mut next = self.advance(TaskStatus::InProgress, ActivityKind::Updated, actor, now);

        if self.status == TaskStatus::NeedsPickup {
            next.picked_up = Some(Attribution::stamp(actor, now));
        } else if next.started.is_none() {
            next.started = Some(Attribution::stamp(actor, now));
        }
        Ok(next)
    }

    /// Pauses a task in progress so it shows up for pickup.
    ///
    /// Existing attribution stamps are kept as they are.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IllegalTransition`] unless the task is in
    /// progress.
    pub fn pause(&self, actor: &Actor, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        self.ensure_allowed(TaskAction::Pause)?;
        let now = timestamp(clock);
        Ok(self.advance(TaskStatus::NeedsPickup, ActivityKind::Updated, actor, now))
    }

    /// Issues a confirmation token for completing the task. Does not change
    /// the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IllegalTransition`] unless the task is in
    /// progress.
    pub fn request_complete(&self, actor: &Actor) -> Result<PendingCompletion, TaskDomainError> {
        self.ensure_allowed(TaskAction::RequestComplete)?;
        Ok(PendingCompletion {
            task_id: self.id,
            actor: actor.clone(),
            observed_updated_at: self.updated_at,
        })
    }

    /// Completes a task in progress and stamps the completion attribution.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IllegalTransition`] unless the task is in
    /// progress.
    pub fn complete(&self, actor: &Actor, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        self.ensure_allowed(TaskAction::Complete)?;
        let now = timestamp(clock);
        let mut next = self.advance(TaskStatus::Completed, ActivityKind::Completed, actor, now);
        next.completed = Some(Attribution::stamp(actor, now));
        Ok(next)
    }

    /// Completes the task on behalf of a confirmed completion request.
    ///
    /// The status is validated again, so a token obtained before the task
    /// was paused cannot complete it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CompletionTaskMismatch`] when the token was
    /// issued for another task, or [`TaskDomainError::IllegalTransition`]
    /// when the task is no longer in progress.
    pub fn confirm_completion(
        &self,
        pending: &PendingCompletion,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        if pending.task_id != self.id {
            return Err(TaskDomainError::CompletionTaskMismatch {
                requested: pending.task_id,
                confirmed: self.id,
            });
        }
        self.complete(&pending.actor, clock)
    }

    /// Applies form edits without touching the status.
    ///
    /// Appends a `moved` entry when the board changes, an `assigned` entry
    /// when the assignee changes and one `updated` entry listing any other
    /// changed fields. `updated_at` is bumped even when nothing changed.
    #[must_use]
    pub fn edit(&self, edit: &TaskEdit, actor: &Actor, clock: &impl Clock) -> Self {
        let now = timestamp(clock);
        let mut next = self.clone();
        let mut changed_fields = Vec::new();
        let mut entries = Vec::new();

        if let Some(title) = edit.title.as_deref().map(title_or_default)
            && title != next.title
        {
            next.title = title;
            changed_fields.push("title");
        }
        if let Some(description) = edit.description.as_deref().map(description_or_default)
            && description != next.description
        {
            next.description = description;
            changed_fields.push("description");
        }
        if let Some(priority) = edit.priority
            && priority != next.priority
        {
            next.priority = priority;
            changed_fields.push("priority");
        }
        if let Some(deadline) = edit.deadline
            && deadline != next.deadline
        {
            next.deadline = deadline;
            changed_fields.push("deadline");
        }
        if !changed_fields.is_empty() {
            entries.push(ActivityEntry::new(
                ActivityKind::Updated,
                format!("changed: {}", changed_fields.join(", ")),
                actor,
                now,
            ));
        }
        if let Some(assignee) = &edit.assignee
            && *assignee != next.assignee
        {
            let description = assignee.as_ref().map_or_else(
                || "assignment cleared".to_owned(),
                |assigned| format!("assigned to {}", assigned.name),
            );
            next.assignee.clone_from(assignee);
            entries.push(ActivityEntry::new(
                ActivityKind::Assigned,
                description,
                actor,
                now,
            ));
        }
        if let Some(board) = edit.board
            && board != next.board
        {
            entries.push(ActivityEntry::new(
                ActivityKind::Moved,
                format!("board: {} -> {board}", next.board),
                actor,
                now,
            ));
            next.board = board;
        }

        next.activities = entries
            .into_iter()
            .fold(next.activities, |log, entry| log.append(entry));
        next.updated_at = now;
        next
    }

    /// Checks that `actor` may delete this task and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DeletionDisabled`] when deletion is
    /// switched off, [`TaskDomainError::IllegalTransition`] unless the task
    /// is completed, and [`TaskDomainError::NotAManager`] unless `actor` is a
    /// manager.
    pub fn authorize_delete(
        &self,
        actor: &Actor,
        deletion_enabled: bool,
    ) -> Result<TaskId, TaskDomainError> {
        if !deletion_enabled {
            return Err(TaskDomainError::DeletionDisabled);
        }
        self.ensure_allowed(TaskAction::Delete)?;
        if !actor.is_manager() {
            return Err(TaskDomainError::NotAManager {
                task_id: self.id,
                user_id: actor.id().clone(),
            });
        }
        Ok(self.id)
    }

    fn ensure_allowed(&self, action: TaskAction) -> Result<(), TaskDomainError> {
        if action.is_allowed_from(self.status) {
            Ok(())
        } else {
            Err(TaskDomainError::IllegalTransition {
                task_id: self.id,
                action,
                status: self.status,
            })
        }
    }

    /// Returns a copy moved to `status` with a status-change entry appended.
    fn advance(
        &self,
        status: TaskStatus,
        kind: ActivityKind,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status,
            updated_at: now,
            activities: self
                .activities
                .append(ActivityEntry::status_change(kind, status, actor, now)),
            ..self.clone()
        }
    }
}
