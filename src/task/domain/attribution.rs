//! Attribution stamps and their reconstruction from the activity log.
//!
//! Records written before the attribution fields existed only carry the
//! activity log. The resolver functions below recover display names from
//! it. Callers always prefer a stored attribution and only fall back to the
//! log when none is present.

use super::{ActivityKind, ActivityLog, Actor, Task, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who reached a lifecycle milestone and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// User who performed the milestone action.
    pub user_id: UserId,
    /// Display name at the time of the action.
    pub user_name: String,
    /// When the action happened.
    pub at: DateTime<Utc>,
}

impl Attribution {
    /// Stamps `actor` at `at`.
    #[must_use]
    pub fn stamp(actor: &Actor, at: DateTime<Utc>) -> Self {
        Self {
            user_id: actor.id().clone(),
            user_name: actor.name().to_owned(),
            at,
        }
    }
}

/// Returns the name of whoever first moved the task into progress.
///
/// Scans for the earliest `updated` entry carrying an in-progress marker;
/// later ones are pickups or resumptions and are ignored.
#[must_use]
pub fn resolve_starter(log: &ActivityLog) -> Option<&str> {
    log.iter()
        .find(|entry| entry.is_status_update_to(TaskStatus::InProgress))
        .map(|entry| entry.user_name())
        .filter(|name| !name.is_empty())
}

/// Returns the name of whoever picked the task up after a pause.
///
/// Looks for the first pair of adjacent entries where a needs-pickup update
/// is immediately followed by an in-progress update and returns the second
/// entry's user. Relies on the log being in chronological order.
#[must_use]
pub fn resolve_picker(log: &ActivityLog) -> Option<&str> {
    log.entries()
        .windows(2)
        .find_map(|pair| match pair {
            [paused, resumed]
                if paused.is_status_update_to(TaskStatus::NeedsPickup)
                    && resumed.is_status_update_to(TaskStatus::InProgress) =>
            {
                Some(resumed.user_name())
            }
            _ => None,
        })
        .filter(|name| !name.is_empty())
}

/// Returns the name of whoever created the task.
#[must_use]
pub fn resolve_creator(log: &ActivityLog) -> Option<&str> {
    log.iter()
        .find(|entry| entry.kind() == ActivityKind::Created)
        .map(|entry| entry.user_name())
        .filter(|name| !name.is_empty())
}

/// Returns the name of whoever most recently completed the task.
#[must_use]
pub fn resolve_completer(log: &ActivityLog) -> Option<&str> {
    log.iter()
        .rev()
        .find(|entry| entry.kind() == ActivityKind::Completed)
        .map(|entry| entry.user_name())
        .filter(|name| !name.is_empty())
}

/// Display names for every lifecycle milestone of a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedAttribution {
    /// Who created the task.
    pub created_by: Option<String>,
    /// Who first started the task.
    pub started_by: Option<String>,
    /// Who last picked the task up.
    pub picked_up_by: Option<String>,
    /// Who completed the task. Only set for completed tasks.
    pub completed_by: Option<String>,
}

impl ResolvedAttribution {
    /// Resolves display names for `task`, stored field first, log second.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        let log = task.activities();
        let completed_by = if task.status() == TaskStatus::Completed {
            stored_or(task.completed(), || resolve_completer(log))
        } else {
            None
        };

        Self {
            created_by: resolve_creator(log).map(str::to_owned),
            started_by: stored_or(task.started(), || resolve_starter(log)),
            picked_up_by: stored_or(task.picked_up(), || resolve_picker(log)),
            completed_by,
        }
    }
}

fn stored_or<'a>(
    stored: Option<&'a Attribution>,
    fallback: impl FnOnce() -> Option<&'a str>,
) -> Option<String> {
    stored
        .map(|attribution| attribution.user_name.as_str())
        .filter(|name| !name.is_empty())
        .or_else(fallback)
        .map(str::to_owned)
}
