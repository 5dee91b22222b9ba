//! Shared clocks and fixtures for task unit tests.

use crate::task::domain::{Actor, Board, Task, TaskDraft};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::atomic::{AtomicI64, Ordering};

/// Instant every test clock starts from.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0)
        .single()
        .expect("valid test epoch")
}

/// Clock that advances one second on every reading, so consecutive
/// mutations always carry distinct timestamps.
#[derive(Debug)]
pub struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::starting_at(epoch())
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + TimeDelta::seconds(tick)
    }
}

#[fixture]
pub fn clock() -> SteppingClock {
    SteppingClock::default()
}

#[fixture]
pub fn sanne() -> Actor {
    Actor::employee("u-sanne", "Sanne")
}

#[fixture]
pub fn daan() -> Actor {
    Actor::employee("u-daan", "Daan")
}

#[fixture]
pub fn manager() -> Actor {
    Actor::manager("u-mila", "Mila")
}

/// Creates a todo task on the front store board.
pub fn todo_task(title: &str, actor: &Actor, clock: &SteppingClock) -> Task {
    Task::create(TaskDraft::new(title), actor, Board::Voorwinkel, clock)
}
