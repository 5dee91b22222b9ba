//! Service layer for the board's task lifecycle.

use crate::config::BoardConfig;
use crate::task::{
    domain::{
        Actor, Board, BoardView, PendingCompletion, Task, TaskAction, TaskDomainError, TaskDraft,
        TaskEdit, TaskId,
    },
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The lifecycle rules rejected the action.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The store rejected or failed the write.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// The task is not part of the last confirmed collection.
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Holds the last task collection confirmed by the store. Every mutation
/// is computed from that collection, persisted, and followed by a full
/// re-fetch; the collection is only replaced after the re-fetch succeeds.
pub struct TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: BoardConfig,
    confirmed: RwLock<Vec<Task>>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a service with an empty confirmed collection.
    ///
    /// Call [`Self::refresh`] to load the stored tasks.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, config: BoardConfig) -> Self {
        Self {
            store,
            clock,
            config,
            confirmed: RwLock::new(Vec::new()),
        }
    }

    /// Returns the board settings.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Replaces the confirmed collection with the store's current contents.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the fetch fails; the
    /// confirmed collection is then left as it was.
    pub async fn refresh(&self) -> TaskLifecycleResult<()> {
        let tasks = self.store.fetch_all().await.inspect_err(|err| {
            tracing::warn!(error = %err, "task refresh failed");
        })?;
        tracing::debug!(count = tasks.len(), "task collection refreshed");
        *self.confirmed.write().await = tasks;
        Ok(())
    }

    /// Returns the confirmed collection, newest first.
    pub async fn tasks(&self) -> Vec<Task> {
        self.confirmed.read().await.clone()
    }

    /// Returns one task from the confirmed collection.
    pub async fn task(&self, id: TaskId) -> Option<Task> {
        self.confirmed
            .read()
            .await
            .iter()
            .find(|task| task.id() == id)
            .cloned()
    }

    /// Creates and stores a new task.
    ///
    /// Without an explicit board in `draft` the task lands on
    /// `current_board`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persisting or re-fetching
    /// fails.
    pub async fn create(
        &self,
        draft: TaskDraft,
        actor: &Actor,
        current_board: Board,
    ) -> TaskLifecycleResult<Task> {
        let task = Task::create(draft, actor, current_board, &*self.clock);
        self.store.insert(&task).await.inspect_err(|err| {
            tracing::warn!(task_id = %task.id(), error = %err, "task insert failed");
        })?;
        tracing::info!(
            task_id = %task.id(),
            user_id = %actor.id(),
            board = %task.board(),
            "task created"
        );
        self.refresh().await?;
        Ok(task)
    }

    /// Creates a task for a user that has not picked a board yet.
    ///
    /// Without an explicit board in `draft` the task lands on the
    /// configured default board.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persisting or re-fetching
    /// fails.
    pub async fn create_on_default_board(
        &self,
        draft: TaskDraft,
        actor: &Actor,
    ) -> TaskLifecycleResult<Task> {
        self.create(draft, actor, self.config.default_board).await
    }

    /// Starts a todo task or picks up a paused one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the
    /// transition is illegal, or the store rejects the write.
    pub async fn start(&self, id: TaskId, actor: &Actor) -> TaskLifecycleResult<Task> {
        let current = self.confirmed_task(id).await?;
        let next = Self::checked(TaskAction::Start, actor, current.start(actor, &*self.clock))?;
        self.commit(TaskAction::Start, actor, &current, next).await
    }

    /// Pauses a task in progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the
    /// transition is illegal, or the store rejects the write.
    pub async fn pause(&self, id: TaskId, actor: &Actor) -> TaskLifecycleResult<Task> {
        let current = self.confirmed_task(id).await?;
        let next = Self::checked(TaskAction::Pause, actor, current.pause(actor, &*self.clock))?;
        self.commit(TaskAction::Pause, actor, &current, next).await
    }

    /// Asks to complete a task in progress and returns the token that
    /// [`Self::complete`] expects once the user confirms.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown or not in
    /// progress.
    pub async fn request_complete(
        &self,
        id: TaskId,
        actor: &Actor,
    ) -> TaskLifecycleResult<PendingCompletion> {
        let current = self.confirmed_task(id).await?;
        Self::checked(
            TaskAction::RequestComplete,
            actor,
            current.request_complete(actor),
        )
    }

    /// Completes a task after the user confirmed a completion request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, no longer
    /// in progress, or the store rejects the write.
    pub async fn complete(&self, pending: PendingCompletion) -> TaskLifecycleResult<Task> {
        let actor = pending.actor().clone();
        let current = self.confirmed_task(pending.task_id()).await?;
        if current.updated_at() != pending.observed_updated_at() {
            tracing::debug!(
                task_id = %current.id(),
                "task changed since completion was requested"
            );
        }
        let next = Self::checked(
            TaskAction::Complete,
            &actor,
            current.confirm_completion(&pending, &*self.clock),
        )?;
        self.commit(TaskAction::Complete, &actor, &current, next)
            .await
    }

    /// Applies form edits to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown or the store
    /// rejects the write.
    pub async fn edit(
        &self,
        id: TaskId,
        edit: &TaskEdit,
        actor: &Actor,
    ) -> TaskLifecycleResult<Task> {
        let current = self.confirmed_task(id).await?;
        let next = current.edit(edit, actor, &*self.clock);
        self.commit(TaskAction::Edit, actor, &current, next).await
    }

    /// Deletes a completed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, deletion is
    /// disabled, the task is not completed, `actor` is not a manager, or
    /// the store fails.
    pub async fn delete(&self, id: TaskId, actor: &Actor) -> TaskLifecycleResult<()> {
        let current = self.confirmed_task(id).await?;
        let task_id = Self::checked(
            TaskAction::Delete,
            actor,
            current.authorize_delete(actor, self.config.allow_task_deletion),
        )?;
        self.store.remove(task_id).await.inspect_err(|err| {
            tracing::warn!(task_id = %task_id, error = %err, "task delete failed");
        })?;
        tracing::info!(task_id = %task_id, user_id = %actor.id(), "task deleted");
        self.refresh().await
    }

    /// Projects the confirmed collection onto one board.
    pub async fn board_view(&self, board: Board) -> BoardView {
        let tasks = self.confirmed.read().await;
        BoardView::build(
            &tasks,
            board,
            self.clock.utc(),
            self.config.deadline_warning_days,
        )
    }

    async fn confirmed_task(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.task(id)
            .await
            .ok_or(TaskLifecycleError::UnknownTask(id))
    }

    fn checked<T>(
        action: TaskAction,
        actor: &Actor,
        outcome: Result<T, TaskDomainError>,
    ) -> TaskLifecycleResult<T> {
        outcome.map_err(|err| {
            tracing::warn!(
                action = %action,
                user_id = %actor.id(),
                error = %err,
                "task action rejected"
            );
            TaskLifecycleError::Domain(err)
        })
    }

    async fn commit(
        &self,
        action: TaskAction,
        actor: &Actor,
        current: &Task,
        next: Task,
    ) -> TaskLifecycleResult<Task> {
        self.store
            .persist_update(&next, current.updated_at())
            .await
            .inspect_err(|err| {
                tracing::warn!(
                    task_id = %next.id(),
                    action = %action,
                    error = %err,
                    "task update failed"
                );
            })?;
        tracing::info!(
            task_id = %next.id(),
            action = %action,
            user_id = %actor.id(),
            status = %next.status(),
            "task updated"
        );
        self.refresh().await?;
        Ok(next)
    }
}
