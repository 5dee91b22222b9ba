//! In-memory integration tests for the task lifecycle.

use super::helpers::{TestService, manager, service_over, service_with, store, u1, u2};
use eyre::{OptionExt, bail, ensure};
use rstest::{fixture, rstest};
use std::sync::Arc;
use storeboard::config::BoardConfig;
use storeboard::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{
        ActivityKind, Actor, Board, ResolvedAttribution, Task, TaskAction, TaskDomainError,
        TaskDraft, TaskRecord, TaskStatus,
    },
    services::TaskLifecycleError,
};

#[fixture]
fn service(store: Arc<InMemoryTaskStore>) -> TestService {
    service_over(&store)
}

async fn create_front_task(service: &TestService, actor: &Actor) -> eyre::Result<Task> {
    Ok(service
        .create(
            TaskDraft::new("Stelling A bijvullen").with_board(Board::Voorwinkel),
            actor,
            Board::Achterwinkel,
        )
        .await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scenario_create_starts_in_todo(service: TestService, u1: Actor) -> eyre::Result<()> {
    let task = create_front_task(&service, &u1).await?;

    ensure!(task.status() == TaskStatus::Todo);
    ensure!(task.board() == Board::Voorwinkel);
    ensure!(task.activities().len() == 1);
    let first = task.activities().iter().next().ok_or_eyre("created entry")?;
    ensure!(first.kind() == ActivityKind::Created);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scenario_start_pause_pickup_complete(
    service: TestService,
    u1: Actor,
    u2: Actor,
    manager: Actor,
) -> eyre::Result<()> {
    let task = create_front_task(&service, &u1).await?;

    let started = service.start(task.id(), &u1).await?;
    ensure!(started.status() == TaskStatus::InProgress);
    ensure!(started.started().map(|s| s.user_id.as_str()) == Some("U1"));
    ensure!(started.picked_up().is_none());

    service.pause(task.id(), &u1).await?;
    let picked = service.start(task.id(), &u2).await?;
    ensure!(picked.status() == TaskStatus::InProgress);
    ensure!(picked.started().map(|s| s.user_id.as_str()) == Some("U1"));
    ensure!(picked.picked_up().map(|s| s.user_id.as_str()) == Some("U2"));

    let done = service
        .complete(service.request_complete(task.id(), &u2).await?)
        .await?;
    ensure!(done.status() == TaskStatus::Completed);
    ensure!(done.completed().map(|s| s.user_id.as_str()) == Some("U2"));
    ensure!(!done.available_actions(&u2).contains(&TaskAction::Delete));
    ensure!(done.available_actions(&manager).contains(&TaskAction::Delete));

    let kinds: Vec<_> = done.activities().iter().map(|entry| entry.kind()).collect();
    ensure!(
        kinds
            == [
                ActivityKind::Created,
                ActivityKind::Updated,
                ActivityKind::Updated,
                ActivityKind::Updated,
                ActivityKind::Completed,
            ]
    );

    let names = ResolvedAttribution::for_task(&done);
    ensure!(names.started_by.as_deref() == Some("Sanne"));
    ensure!(names.picked_up_by.as_deref() == Some("Daan"));
    ensure!(names.completed_by.as_deref() == Some("Daan"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scenario_complete_on_todo_is_rejected(
    service: TestService,
    u1: Actor,
) -> eyre::Result<()> {
    let task = create_front_task(&service, &u1).await?;

    let result = service.request_complete(task.id(), &u1).await;
    let Err(TaskLifecycleError::Domain(TaskDomainError::IllegalTransition { status, .. })) = result
    else {
        bail!("expected illegal transition, got {result:?}");
    };
    ensure!(status == TaskStatus::Todo);

    let unchanged = service.task(task.id()).await.ok_or_eyre("task kept")?;
    ensure!(unchanged == task);
    ensure!(unchanged.activities().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_managers_delete_completed_tasks(
    service: TestService,
    u1: Actor,
    manager: Actor,
) -> eyre::Result<()> {
    let task = create_front_task(&service, &u1).await?;
    service.start(task.id(), &u1).await?;

    ensure!(matches!(
        service.delete(task.id(), &manager).await,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::IllegalTransition { .. }
        ))
    ));

    service
        .complete(service.request_complete(task.id(), &u1).await?)
        .await?;
    ensure!(matches!(
        service.delete(task.id(), &u1).await,
        Err(TaskLifecycleError::Domain(TaskDomainError::NotAManager { .. }))
    ));

    service.delete(task.id(), &manager).await?;
    ensure!(service.task(task.id()).await.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_session_sees_changes_after_refresh(
    store: Arc<InMemoryTaskStore>,
    u1: Actor,
) -> eyre::Result<()> {
    let front = service_over(&store);
    let back = service_over(&store);

    let task = create_front_task(&front, &u1).await?;
    ensure!(back.tasks().await.is_empty());

    back.refresh().await?;
    ensure!(back.task(task.id()).await == Some(task));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_survive_record_round_trip(
    service: TestService,
    u1: Actor,
    u2: Actor,
) -> eyre::Result<()> {
    let task = create_front_task(&service, &u1).await?;
    service.start(task.id(), &u1).await?;
    service.pause(task.id(), &u1).await?;
    let picked = service.start(task.id(), &u2).await?;

    let json = serde_json::to_value(TaskRecord::from(&picked))?;
    ensure!(json.get("pickedUpBy").and_then(|v| v.as_str()) == Some("U2"));
    ensure!(json.get("status").and_then(|v| v.as_str()) == Some("in-progress"));

    let decoded = Task::from_record(serde_json::from_value(json)?, &mockable::DefaultClock);
    ensure!(decoded == picked);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_without_a_board_choice_use_the_configured_default(
    store: Arc<InMemoryTaskStore>,
    u1: Actor,
) -> eyre::Result<()> {
    let service = service_with(
        &store,
        BoardConfig {
            default_board: Board::Achterwinkel,
            ..BoardConfig::default()
        },
    );

    let unplaced = service
        .create_on_default_board(TaskDraft::new("Koelcel"), &u1)
        .await?;
    ensure!(unplaced.board() == Board::Achterwinkel);

    let draft = TaskDraft::new("Kassa 3").with_board(Board::Voorwinkel);
    let placed = service.create_on_default_board(draft, &u1).await?;
    ensure!(placed.board() == Board::Voorwinkel);
    Ok(())
}
