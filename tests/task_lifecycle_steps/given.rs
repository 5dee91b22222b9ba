//! Given steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use storeboard::task::domain::{Actor, Board, TaskDraft};

#[given(r#"employee "{name}" is signed in"#)]
fn employee_signed_in(world: &mut TaskLifecycleWorld, name: String) {
    let actor = Actor::employee(format!("u-{}", name.to_lowercase()), name.clone());
    world.actors.insert(name, actor);
}

#[given(r#"manager "{name}" is signed in"#)]
fn manager_signed_in(world: &mut TaskLifecycleWorld, name: String) {
    let actor = Actor::manager(format!("u-{}", name.to_lowercase()), name.clone());
    world.actors.insert(name, actor);
}

#[given(r#""{name}" created the task "{title}" on the "{board}" board"#)]
fn task_created(
    world: &mut TaskLifecycleWorld,
    name: String,
    title: String,
    board: String,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let board = Board::try_from(board.as_str())
        .map_err(|err| eyre::eyre!("invalid board in scenario: {err}"))?;
    let created = run_async(world.service.create(
        TaskDraft::new(title).with_board(board),
        &actor,
        board,
    ))
    .wrap_err("create task for scenario setup")?;
    world.task_id = Some(created.id());
    Ok(())
}

#[given(r#""{name}" started the task"#)]
fn task_started(world: &mut TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let id = world.task_id()?;
    run_async(world.service.start(id, &actor)).wrap_err("start task in scenario setup")?;
    Ok(())
}

#[given(r#""{name}" completed the task"#)]
fn task_completed(world: &mut TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let id = world.task_id()?;
    let pending = run_async(world.service.request_complete(id, &actor))
        .wrap_err("request completion in scenario setup")?;
    run_async(world.service.complete(pending)).wrap_err("complete task in scenario setup")?;
    Ok(())
}
