//! Shared test helpers for in-memory integration tests.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use storeboard::config::BoardConfig;
use storeboard::task::{
    adapters::memory::InMemoryTaskStore, domain::Actor, services::TaskLifecycleService,
};

/// Clock that advances one second per reading.
#[derive(Debug, Default)]
pub struct SteppingClock {
    ticks: AtomicI64,
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let start = Utc
            .with_ymd_and_hms(2024, 3, 4, 9, 0, 0)
            .single()
            .unwrap_or_default();
        start + TimeDelta::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }
}

/// Service type used by the in-memory integration tests.
pub type TestService = TaskLifecycleService<InMemoryTaskStore, SteppingClock>;

/// Provides a fresh shared store for each test.
#[fixture]
pub fn store() -> Arc<InMemoryTaskStore> {
    Arc::new(InMemoryTaskStore::new())
}

/// Builds a service over `store` with default settings.
pub fn service_over(store: &Arc<InMemoryTaskStore>) -> TestService {
    service_with(store, BoardConfig::default())
}

/// Builds a service over `store` with the given settings.
pub fn service_with(store: &Arc<InMemoryTaskStore>, config: BoardConfig) -> TestService {
    TaskLifecycleService::new(Arc::clone(store), Arc::new(SteppingClock::default()), config)
}

/// First employee.
#[fixture]
pub fn u1() -> Actor {
    Actor::employee("U1", "Sanne")
}

/// Second employee.
#[fixture]
pub fn u2() -> Actor {
    Actor::employee("U2", "Daan")
}

/// Store manager.
#[fixture]
pub fn manager() -> Actor {
    Actor::manager("M1", "Mila")
}
