//! In-memory task store for tests and single-process use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

use crate::task::{
    domain::{Task, TaskId},
    ports::{ChangeNotifier, TaskStore, TaskStoreError, TaskStoreResult, TasksChanged},
};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Thread-safe in-memory task store.
///
/// Every successful write broadcasts [`TasksChanged`] to subscribers.
/// Clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
    changes: broadcast::Sender<TasksChanged>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            changes,
        }
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, HashMap<TaskId, Task>>> {
        self.tasks.read().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, HashMap<TaskId, Task>>> {
        self.tasks.write().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn notify(&self) {
        if self.changes.send(TasksChanged).is_err() {
            tracing::trace!("task change dropped, no subscribers");
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn fetch_all(&self) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.read()?;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(all)
    }

    async fn insert(&self, task: &Task) -> TaskStoreResult<()> {
        {
            let mut tasks = self.write()?;
            if tasks.contains_key(&task.id()) {
                return Err(TaskStoreError::DuplicateTask(task.id()));
            }
            tasks.insert(task.id(), task.clone());
        }
        self.notify();
        Ok(())
    }

    async fn persist_update(
        &self,
        task: &Task,
        expected_updated_at: DateTime<Utc>,
    ) -> TaskStoreResult<()> {
        {
            let mut tasks = self.write()?;
            let stored = tasks
                .get_mut(&task.id())
                .ok_or(TaskStoreError::NotFound(task.id()))?;
            if stored.updated_at() != expected_updated_at {
                return Err(TaskStoreError::Conflict {
                    task_id: task.id(),
                    expected: expected_updated_at,
                    found: stored.updated_at(),
                });
            }
            *stored = task.clone();
        }
        self.notify();
        Ok(())
    }

    async fn remove(&self, id: TaskId) -> TaskStoreResult<()> {
        {
            let mut tasks = self.write()?;
            tasks.remove(&id).ok_or(TaskStoreError::NotFound(id))?;
        }
        self.notify();
        Ok(())
    }
}

impl ChangeNotifier for InMemoryTaskStore {
    fn subscribe(&self) -> broadcast::Receiver<TasksChanged> {
        self.changes.subscribe()
    }
}
