//! `PostgreSQL` implementation of the task store.

use super::{models::TaskRow, schema::tasks};
use crate::task::{
    domain::{
        Assignee, Attribution, Board, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus,
        UserId, activity_log_from_json, title_or_default,
    },
    ports::{ChangeNotifier, TaskStore, TaskStoreError, TaskStoreResult, TasksChanged},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tokio::sync::broadcast;

/// `PostgreSQL` connection pool type used by the task store.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// `PostgreSQL`-backed task store.
///
/// Subscribers are notified after this process's own successful writes.
/// Writes by other clients are only seen on the next refresh.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
    changes: broadcast::Sender<TasksChanged>,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub fn new(pool: TaskPgPool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { pool, changes }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }

    fn notify(&self) {
        if self.changes.send(TasksChanged).is_err() {
            tracing::trace!("task change dropped, no subscribers");
        }
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn fetch_all(&self) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            Ok(rows.into_iter().map(row_to_task).collect())
        })
        .await
    }

    async fn insert(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskStoreError::DuplicateTask(task_id)
                    }
                    _ => TaskStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await?;
        self.notify();
        Ok(())
    }

    async fn persist_update(
        &self,
        task: &Task,
        expected_updated_at: DateTime<Utc>,
    ) -> TaskStoreResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(row.id))
                    .filter(tasks::updated_at.eq(expected_updated_at)),
            )
            .set(&row)
            .execute(connection)
            .map_err(TaskStoreError::persistence)?;
            if updated > 0 {
                return Ok(());
            }

            let found = tasks::table
                .filter(tasks::id.eq(row.id))
                .select(tasks::updated_at)
                .first::<DateTime<Utc>>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            Err(found.map_or(TaskStoreError::NotFound(task_id), |stored| {
                TaskStoreError::Conflict {
                    task_id,
                    expected: expected_updated_at,
                    found: stored,
                }
            }))
        })
        .await?;
        self.notify();
        Ok(())
    }

    async fn remove(&self, id: TaskId) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            if deleted == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await?;
        self.notify();
        Ok(())
    }
}

impl ChangeNotifier for PostgresTaskStore {
    fn subscribe(&self) -> broadcast::Receiver<TasksChanged> {
        self.changes.subscribe()
    }
}

fn to_row(task: &Task) -> TaskStoreResult<TaskRow> {
    let activities =
        serde_json::to_value(task.activities()).map_err(TaskStoreError::persistence)?;
    let (started_by, started_by_name, started_at) = split_attribution(task.started());
    let (picked_up_by, picked_up_by_name, picked_up_at) = split_attribution(task.picked_up());
    let (completed_by, completed_by_name, completed_at) = split_attribution(task.completed());

    Ok(TaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        assigned_to: task
            .assignee()
            .map(|assignee| assignee.user_id.as_str().to_owned()),
        assigned_to_name: task
            .assignee()
            .map(|assignee| assignee.name.clone())
            .unwrap_or_default(),
        board: task.board().as_str().to_owned(),
        deadline: task.deadline(),
        activities,
        started_by,
        started_by_name,
        started_at,
        picked_up_by,
        picked_up_by_name,
        picked_up_at,
        completed_by,
        completed_by_name,
        completed_at,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

/// Maps a stored row onto a task, normalizing legacy values the same way
/// [`Task::from_record`] does.
fn row_to_task(row: TaskRow) -> Task {
    let TaskRow {
        id,
        title,
        description,
        status,
        priority,
        assigned_to,
        assigned_to_name,
        board,
        deadline,
        activities,
        started_by,
        started_by_name,
        started_at,
        picked_up_by,
        picked_up_by_name,
        picked_up_at,
        completed_by,
        completed_by_name,
        completed_at,
        created_at,
        updated_at,
    } = row;

    let assignee = assigned_to
        .filter(|user_id| !user_id.trim().is_empty())
        .map(|user_id| Assignee {
            user_id: UserId::new(user_id),
            name: assigned_to_name,
        });

    Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: title_or_default(&title),
        description,
        status: TaskStatus::normalize(Some(&status)),
        priority: TaskPriority::normalize(Some(&priority)),
        board: Board::normalize(Some(&board)),
        assignee,
        deadline,
        started: join_attribution(started_by, started_by_name, started_at, updated_at),
        picked_up: join_attribution(picked_up_by, picked_up_by_name, picked_up_at, updated_at),
        completed: join_attribution(completed_by, completed_by_name, completed_at, updated_at),
        created_at,
        updated_at,
        activities: activity_log_from_json(&activities, created_at),
    })
}

fn split_attribution(
    attribution: Option<&Attribution>,
) -> (Option<String>, Option<String>, Option<DateTime<Utc>>) {
    attribution.map_or((None, None, None), |stamp| {
        (
            Some(stamp.user_id.as_str().to_owned()),
            Some(stamp.user_name.clone()),
            Some(stamp.at),
        )
    })
}

fn join_attribution(
    user_id: Option<String>,
    user_name: Option<String>,
    at: Option<DateTime<Utc>>,
    fallback_at: DateTime<Utc>,
) -> Option<Attribution> {
    user_id
        .filter(|id| !id.trim().is_empty())
        .map(|id| Attribution {
            user_id: UserId::new(id),
            user_name: user_name.unwrap_or_default(),
            at: at.unwrap_or(fallback_at),
        })
}
