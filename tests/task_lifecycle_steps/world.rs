//! Shared world state for task lifecycle BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use storeboard::config::BoardConfig;
use storeboard::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Actor, PendingCompletion, Task, TaskId},
    services::{TaskLifecycleError, TaskLifecycleService},
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskStore, DefaultClock>;

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskLifecycleWorld {
    pub service: TestTaskService,
    pub actors: HashMap<String, Actor>,
    pub task_id: Option<TaskId>,
    pub pending: Option<PendingCompletion>,
    pub last_error: Option<TaskLifecycleError>,
}

impl TaskLifecycleWorld {
    /// Creates a world with an empty board.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(DefaultClock),
            BoardConfig::default(),
        );

        Self {
            service,
            actors: HashMap::new(),
            task_id: None,
            pending: None,
            last_error: None,
        }
    }

    /// Looks up a signed-in actor by display name.
    pub fn actor(&self, name: &str) -> Result<Actor, eyre::Report> {
        self.actors
            .get(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("actor {name} is not signed in"))
    }

    /// Returns the task the scenario is about.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the confirmed state of the scenario's task.
    pub fn current_task(&self) -> Result<Task, eyre::Report> {
        let id = self.task_id()?;
        run_async(self.service.task(id))
            .ok_or_else(|| eyre::eyre!("task {id} is not on the board"))
    }

    /// Records the outcome of a user action.
    pub fn record<T>(&mut self, result: Result<T, TaskLifecycleError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(err) => {
                self.last_error = Some(err);
                None
            }
        }
    }
}

impl Default for TaskLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
