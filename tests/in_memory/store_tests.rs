//! Store contract tests for the in-memory adapter.

use super::helpers::{SteppingClock, store, u1};
use eyre::ensure;
use rstest::rstest;
use std::sync::Arc;
use storeboard::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Actor, Board, Task, TaskDraft, TaskId},
    ports::{ChangeNotifier, TaskStore, TaskStoreError},
};

fn draft_task(title: &str, actor: &Actor, clock: &SteppingClock) -> Task {
    Task::create(TaskDraft::new(title), actor, Board::Voorwinkel, clock)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fetch_all_returns_newest_first(
    store: Arc<InMemoryTaskStore>,
    u1: Actor,
) -> eyre::Result<()> {
    let clock = SteppingClock::default();
    let older = draft_task("ouder", &u1, &clock);
    let newer = draft_task("nieuwer", &u1, &clock);
    store.insert(&older).await?;
    store.insert(&newer).await?;

    let ids: Vec<TaskId> = store.fetch_all().await?.iter().map(Task::id).collect();
    ensure!(ids == [newer.id(), older.id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_insert_is_rejected(
    store: Arc<InMemoryTaskStore>,
    u1: Actor,
) -> eyre::Result<()> {
    let task = draft_task("dubbel", &u1, &SteppingClock::default());
    store.insert(&task).await?;

    let result = store.insert(&task).await;
    ensure!(matches!(result, Err(TaskStoreError::DuplicateTask(id)) if id == task.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_requires_expected_version(
    store: Arc<InMemoryTaskStore>,
    u1: Actor,
) -> eyre::Result<()> {
    let clock = SteppingClock::default();
    let task = draft_task("versie", &u1, &clock);
    store.insert(&task).await?;

    let started = task.start(&u1, &clock)?;
    store.persist_update(&started, task.updated_at()).await?;

    let paused = task.start(&u1, &clock)?.pause(&u1, &clock)?;
    let result = store.persist_update(&paused, task.updated_at()).await;
    ensure!(matches!(
        result,
        Err(TaskStoreError::Conflict { found, .. }) if found == started.updated_at()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_tasks_are_reported(store: Arc<InMemoryTaskStore>, u1: Actor) {
    let task = draft_task("weg", &u1, &SteppingClock::default());

    assert!(matches!(
        store.persist_update(&task, task.updated_at()).await,
        Err(TaskStoreError::NotFound(_))
    ));
    assert!(matches!(
        store.remove(task.id()).await,
        Err(TaskStoreError::NotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn writes_notify_subscribers(store: Arc<InMemoryTaskStore>, u1: Actor) -> eyre::Result<()> {
    let mut changes = store.subscribe();
    let task = draft_task("signaal", &u1, &SteppingClock::default());

    store.insert(&task).await?;
    store.remove(task.id()).await?;

    changes.recv().await?;
    changes.recv().await?;
    ensure!(changes.try_recv().is_err(), "exactly one signal per write");
    Ok(())
}
