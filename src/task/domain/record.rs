//! Flat persisted representation of a task and its tolerant decoding.
//!
//! [`TaskRecord`] uses the field names shared with every other tool that
//! reads the task table (`startedBy`, `pickedUpAt`, `activities`, ...).
//! Decoding never fails: historical and partially written records are
//! normalized to safe defaults.

use super::task::{timestamp, title_or_default};
use super::{
    ActivityEntry, ActivityId, ActivityKind, ActivityLog, Assignee, Attribution, Board,
    PersistedActivityData, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus, UserId,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task as stored by the external data store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskRecord {
    /// Task identifier.
    pub id: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Raw status.
    pub status: Option<String>,
    /// Raw priority.
    pub priority: Option<String>,
    /// Raw board.
    pub board: Option<String>,
    /// Assigned user identifier.
    pub assigned_to: Option<String>,
    /// Assigned user display name.
    pub assigned_to_name: Option<String>,
    /// Deadline as `YYYY-MM-DD` (a trailing time part is ignored).
    pub deadline: Option<String>,
    /// First starter's identifier.
    pub started_by: Option<String>,
    /// First starter's display name.
    pub started_by_name: Option<String>,
    /// First start time.
    pub started_at: Option<String>,
    /// Latest picker's identifier.
    pub picked_up_by: Option<String>,
    /// Latest picker's display name.
    pub picked_up_by_name: Option<String>,
    /// Latest pickup time.
    pub picked_up_at: Option<String>,
    /// Completer's identifier.
    pub completed_by: Option<String>,
    /// Completer's display name.
    pub completed_by_name: Option<String>,
    /// Completion time.
    pub completed_at: Option<String>,
    /// Creation time.
    pub created_at: Option<String>,
    /// Latest mutation time.
    pub updated_at: Option<String>,
    /// Activity log as stored; anything but an array reads as empty.
    pub activities: Value,
}

impl Task {
    /// Builds a task from a stored record, normalizing whatever is missing
    /// or malformed.
    ///
    /// Unknown statuses read as todo, unknown priorities as medium and
    /// unknown boards as the front store. A missing or invalid identifier is
    /// replaced by a fresh one and missing timestamps read as now. Activity
    /// entries without a timestamp take the creation time.
    #[must_use]
    pub fn from_record(record: TaskRecord, clock: &impl Clock) -> Self {
        let now = timestamp(clock);
        let created_at = parse_timestamp(record.created_at.as_deref()).unwrap_or(now);
        let updated_at = parse_timestamp(record.updated_at.as_deref()).unwrap_or(created_at);

        let assignee = non_blank(record.assigned_to).map(|user_id| Assignee {
            user_id: UserId::new(user_id),
            name: record.assigned_to_name.unwrap_or_default(),
        });

        Self::from_persisted(PersistedTaskData {
            id: record
                .id
                .as_deref()
                .and_then(TaskId::parse)
                .unwrap_or_default(),
            title: title_or_default(record.title.as_deref().unwrap_or_default()),
            description: record.description.unwrap_or_default(),
            status: TaskStatus::normalize(record.status.as_deref()),
            priority: TaskPriority::normalize(record.priority.as_deref()),
            board: Board::normalize(record.board.as_deref()),
            assignee,
            deadline: record.deadline.as_deref().and_then(parse_deadline),
            started: attribution(
                record.started_by,
                record.started_by_name,
                record.started_at.as_deref(),
                updated_at,
            ),
            picked_up: attribution(
                record.picked_up_by,
                record.picked_up_by_name,
                record.picked_up_at.as_deref(),
                updated_at,
            ),
            completed: attribution(
                record.completed_by,
                record.completed_by_name,
                record.completed_at.as_deref(),
                updated_at,
            ),
            created_at,
            updated_at,
            activities: activity_log_from_json(&record.activities, created_at),
        })
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        let (started_by, started_by_name, started_at) = split_attribution(task.started());
        let (picked_up_by, picked_up_by_name, picked_up_at) = split_attribution(task.picked_up());
        let (completed_by, completed_by_name, completed_at) = split_attribution(task.completed());

        Self {
            id: Some(task.id().to_string()),
            title: Some(task.title().to_owned()),
            description: Some(task.description().to_owned()),
            status: Some(task.status().as_str().to_owned()),
            priority: Some(task.priority().as_str().to_owned()),
            board: Some(task.board().as_str().to_owned()),
            assigned_to: task.assignee().map(|a| a.user_id.as_str().to_owned()),
            assigned_to_name: task.assignee().map(|a| a.name.clone()),
            deadline: task.deadline().map(|d| d.format("%Y-%m-%d").to_string()),
            started_by,
            started_by_name,
            started_at,
            picked_up_by,
            picked_up_by_name,
            picked_up_at,
            completed_by,
            completed_by_name,
            completed_at,
            created_at: Some(format_timestamp(task.created_at())),
            updated_at: Some(format_timestamp(task.updated_at())),
            activities: serde_json::to_value(task.activities())
                .unwrap_or_else(|_| Value::Array(Vec::new())),
        }
    }
}

/// Decodes a stored activity array.
///
/// A value that is not an array yields an empty log. Every item of an array
/// is kept in stored order: entries without a parseable timestamp take
/// `fallback_at`, unknown kinds read as `updated` and items that are not
/// objects become `updated` entries carrying the item as their description.
#[must_use]
pub fn activity_log_from_json(value: &Value, fallback_at: DateTime<Utc>) -> ActivityLog {
    let Value::Array(items) = value else {
        return ActivityLog::new();
    };
    ActivityLog::from_entries(
        items
            .iter()
            .map(|item| activity_from_json(item, fallback_at))
            .collect(),
    )
}

fn activity_from_json(item: &Value, fallback_at: DateTime<Utc>) -> ActivityEntry {
    let field = |key| text_field(item, key);
    let description = match item {
        Value::Object(_) => field("description").unwrap_or_default().to_owned(),
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    ActivityEntry::from_persisted(PersistedActivityData {
        id: ActivityId::from_persisted(field("id").unwrap_or_default()),
        kind: ActivityKind::normalize(field("type")),
        description,
        timestamp: parse_timestamp(field("timestamp")).unwrap_or(fallback_at),
        user_id: UserId::new(field("userId").unwrap_or_default()),
        user_name: field("userName").unwrap_or_default().to_owned(),
        to_status: field("toStatus").and_then(|raw| TaskStatus::try_from(raw).ok()),
    })
}

fn text_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

/// Formats a timestamp the way records store it (RFC 3339, UTC, `Z`).
#[must_use]
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|value| DateTime::parse_from_rfc3339(value.trim()).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}

fn attribution(
    user_id: Option<String>,
    user_name: Option<String>,
    at: Option<&str>,
    fallback_at: DateTime<Utc>,
) -> Option<Attribution> {
    non_blank(user_id).map(|id| Attribution {
        user_id: UserId::new(id),
        user_name: user_name.unwrap_or_default(),
        at: parse_timestamp(at).unwrap_or(fallback_at),
    })
}

fn split_attribution(
    attribution: Option<&Attribution>,
) -> (Option<String>, Option<String>, Option<String>) {
    attribution.map_or((None, None, None), |stamp| {
        (
            Some(stamp.user_id.as_str().to_owned()),
            Some(stamp.user_name.clone()),
            Some(format_timestamp(stamp.at)),
        )
    })
}
