//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use rstest_bdd_macros::then;
use storeboard::task::{
    domain::{Attribution, Board, TaskDomainError, TaskStatus},
    services::TaskLifecycleError,
};

fn expect_name(
    milestone: &str,
    stamp: Option<&Attribution>,
    expected: &str,
) -> Result<(), eyre::Report> {
    let found = stamp.map(|attribution| attribution.user_name.as_str());
    if found != Some(expected) {
        return Err(eyre::eyre!(
            "expected task {milestone} by {expected}, found {found:?}"
        ));
    }
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.current_task()?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#"the task is on the "{board}" board"#)]
fn task_is_on_board(world: &TaskLifecycleWorld, board: String) -> Result<(), eyre::Report> {
    let expected = Board::try_from(board.as_str())
        .map_err(|err| eyre::eyre!("invalid expected board in scenario: {err}"))?;
    let task = world.current_task()?;
    if task.board() != expected {
        return Err(eyre::eyre!("expected board {expected}, found {}", task.board()));
    }
    Ok(())
}

#[then("the activity log has {count:usize} entries")]
fn activity_log_has(world: &TaskLifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let found = world.current_task()?.activities().len();
    if found != count {
        return Err(eyre::eyre!("expected {count} activity entries, found {found}"));
    }
    Ok(())
}

#[then(r#"the task was started by "{name}""#)]
fn started_by(world: &TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    expect_name("started", world.current_task()?.started(), &name)
}

#[then(r#"the task was picked up by "{name}""#)]
fn picked_up_by(world: &TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    expect_name("picked up", world.current_task()?.picked_up(), &name)
}

#[then(r#"the task was completed by "{name}""#)]
fn completed_by(world: &TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    expect_name("completed", world.current_task()?.completed(), &name)
}

#[then("the action is rejected as an illegal transition")]
fn rejected_as_illegal(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let error = world.last_error.as_ref();
    if !matches!(
        error,
        Some(TaskLifecycleError::Domain(
            TaskDomainError::IllegalTransition { .. }
        ))
    ) {
        return Err(eyre::eyre!("expected IllegalTransition error, got {error:?}"));
    }
    Ok(())
}

#[then("the action is rejected because the user is not a manager")]
fn rejected_as_not_manager(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let error = world.last_error.as_ref();
    if !matches!(
        error,
        Some(TaskLifecycleError::Domain(TaskDomainError::NotAManager { .. }))
    ) {
        return Err(eyre::eyre!("expected NotAManager error, got {error:?}"));
    }
    Ok(())
}

#[then("the task is gone from the board")]
fn task_is_gone(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    if let Some(error) = &world.last_error {
        return Err(eyre::eyre!("last action failed: {error}"));
    }
    let id = world.task_id()?;
    if run_async(world.service.task(id)).is_some() {
        return Err(eyre::eyre!("task {id} is still on the board"));
    }
    Ok(())
}
