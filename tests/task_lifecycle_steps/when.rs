//! When steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use rstest_bdd_macros::when;
use storeboard::task::domain::{Board, TaskDraft};

#[when(r#""{name}" creates the task "{title}" on the "{board}" board"#)]
fn create_task(
    world: &mut TaskLifecycleWorld,
    name: String,
    title: String,
    board: String,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let board = Board::try_from(board.as_str())
        .map_err(|err| eyre::eyre!("invalid board in scenario: {err}"))?;
    let result = run_async(world.service.create(
        TaskDraft::new(title).with_board(board),
        &actor,
        board,
    ));
    if let Some(created) = world.record(result) {
        world.task_id = Some(created.id());
    }
    Ok(())
}

#[when(r#""{name}" starts the task"#)]
fn start_task(world: &mut TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let result = run_async(world.service.start(world.task_id()?, &actor));
    world.record(result);
    Ok(())
}

#[when(r#""{name}" pauses the task"#)]
fn pause_task(world: &mut TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let result = run_async(world.service.pause(world.task_id()?, &actor));
    world.record(result);
    Ok(())
}

#[when(r#""{name}" asks to complete the task"#)]
fn request_completion(world: &mut TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let result = run_async(world.service.request_complete(world.task_id()?, &actor));
    world.pending = world.record(result);
    Ok(())
}

#[when(r#""{name}" confirms the completion"#)]
fn confirm_completion(world: &mut TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let pending = world
        .pending
        .take()
        .ok_or_else(|| eyre::eyre!("{name} has no completion request to confirm"))?;
    let result = run_async(world.service.complete(pending));
    world.record(result);
    Ok(())
}

#[when(r#""{name}" deletes the task"#)]
fn delete_task(world: &mut TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let result = run_async(world.service.delete(world.task_id()?, &actor));
    world.record(result);
    Ok(())
}
