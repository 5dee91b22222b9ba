//! Storage port for the task collection.

use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Writes are last-write-wins across clients except for
/// [`TaskStore::persist_update`], which only succeeds when the stored task
/// is still the version the caller last read.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns every stored task, newest first.
    async fn fetch_all(&self) -> TaskStoreResult<Vec<Task>>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the identifier is
    /// already in use.
    async fn insert(&self, task: &Task) -> TaskStoreResult<()>;

    /// Replaces a stored task if its `updated_at` still equals
    /// `expected_updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist and
    /// [`TaskStoreError::Conflict`] when someone else changed it first.
    async fn persist_update(
        &self,
        task: &Task,
        expected_updated_at: DateTime<Utc>,
    ) -> TaskStoreResult<()>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn remove(&self, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored task changed since the caller read it.
    #[error("task {task_id} was changed concurrently (expected version {expected}, found {found})")]
    Conflict {
        /// Task that was being updated.
        task_id: TaskId,
        /// Version the caller expected.
        expected: DateTime<Utc>,
        /// Version currently stored.
        found: DateTime<Utc>,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
