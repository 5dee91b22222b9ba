//! Append-only activity log attached to every task.
//!
//! Entries are immutable once appended. The stored order is the order of
//! appending, which is chronological; [`ActivityLog::sorted_descending`]
//! exists only for presentation.

use super::{ActivityId, Actor, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kind of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// The task was created.
    Created,
    /// The task moved to another board.
    Moved,
    /// The task's assignee changed.
    Assigned,
    /// Any other change, including status changes other than completion.
    Updated,
    /// The task was completed.
    Completed,
}

impl ActivityKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Moved => "moved",
            Self::Assigned => "assigned",
            Self::Updated => "updated",
            Self::Completed => "completed",
        }
    }

    /// Parses a stored kind, treating anything unrecognised as
    /// [`ActivityKind::Updated`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default().trim().to_ascii_lowercase().as_str() {
            "created" => Self::Created,
            "moved" => Self::Moved,
            "assigned" => Self::Assigned,
            "completed" => Self::Completed,
            _ => Self::Updated,
        }
    }

    /// Returns the fixed display label for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Moved => "Moved",
            Self::Assigned => "Assigned",
            Self::Completed => "Completed",
            Self::Updated => "Updated",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix of the status marker embedded in entry descriptions.
const STATUS_MARKER_PREFIX: &str = "status: ";

/// One immutable record in a task's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    id: ActivityId,
    #[serde(rename = "type")]
    kind: ActivityKind,
    description: String,
    timestamp: DateTime<Utc>,
    user_id: UserId,
    user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to_status: Option<TaskStatus>,
}

/// Parameter object for reconstructing a stored activity entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedActivityData {
    /// Stored identifier; may be empty for historical entries.
    pub id: ActivityId,
    /// Stored kind.
    pub kind: ActivityKind,
    /// Stored free-text description.
    pub description: String,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
    /// Who performed the action.
    pub user_id: UserId,
    /// Display name of who performed the action.
    pub user_name: String,
    /// Structured status marker, absent on historical entries.
    pub to_status: Option<TaskStatus>,
}

impl ActivityEntry {
    /// Creates a fresh entry with a newly generated identifier.
    #[must_use]
    pub fn new(
        kind: ActivityKind,
        description: impl Into<String>,
        actor: &Actor,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            kind,
            description: description.into(),
            timestamp,
            user_id: actor.id().clone(),
            user_name: actor.name().to_owned(),
            to_status: None,
        }
    }

    /// Creates an entry recording a status change.
    ///
    /// The new status is written both as the structured `toStatus` field and
    /// as the `"status: <value>"` description marker older readers expect.
    #[must_use]
    pub fn status_change(
        kind: ActivityKind,
        to_status: TaskStatus,
        actor: &Actor,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            to_status: Some(to_status),
            ..Self::new(
                kind,
                format!("{STATUS_MARKER_PREFIX}{to_status}"),
                actor,
                timestamp,
            )
        }
    }

    /// Reconstructs an entry from storage.
    #[must_use]
    pub fn from_persisted(data: PersistedActivityData) -> Self {
        Self {
            id: data.id,
            kind: data.kind,
            description: data.description,
            timestamp: data.timestamp,
            user_id: data.user_id,
            user_name: data.user_name,
            to_status: data.to_status,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> &ActivityId {
        &self.id
    }

    /// Returns the entry kind.
    #[must_use]
    pub const fn kind(&self) -> ActivityKind {
        self.kind
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns when the action happened.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns who performed the action.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the display name of who performed the action.
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Returns the structured status marker, if the entry has one.
    #[must_use]
    pub const fn to_status(&self) -> Option<TaskStatus> {
        self.to_status
    }

    /// Returns the status this entry moved the task to.
    ///
    /// The structured field wins; historical entries fall back to the
    /// `"status: <value>"` substring convention in the description.
    #[must_use]
    pub fn status_marker(&self) -> Option<TaskStatus> {
        self.to_status.or_else(|| {
            TaskStatus::ALL.into_iter().find(|status| {
                self.description
                    .contains(&format!("{STATUS_MARKER_PREFIX}{status}"))
            })
        })
    }

    /// Returns `true` for an `updated` entry that moved the task to `status`.
    #[must_use]
    pub fn is_status_update_to(&self, status: TaskStatus) -> bool {
        self.kind == ActivityKind::Updated && self.status_marker() == Some(status)
    }

    fn dedupe_key(&self) -> DedupeKey {
        if self.id.is_empty() {
            DedupeKey::Composite {
                timestamp: self.timestamp,
                kind: self.kind,
                user_id: self.user_id.clone(),
                description: self.description.clone(),
            }
        } else {
            DedupeKey::Id(self.id.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupeKey {
    Id(ActivityId),
    Composite {
        timestamp: DateTime<Utc>,
        kind: ActivityKind,
        user_id: UserId,
        description: String,
    },
}

/// Ordered history of a task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLog(Vec<ActivityEntry>);

impl ActivityLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a log from entries already in chronological order.
    #[must_use]
    pub const fn from_entries(entries: Vec<ActivityEntry>) -> Self {
        Self(entries)
    }

    /// Returns a new log with `entry` added at the end.
    ///
    /// Prior entries keep their content and order.
    #[must_use]
    pub fn append(&self, entry: ActivityEntry) -> Self {
        let mut entries = Vec::with_capacity(self.0.len() + 1);
        entries.extend(self.0.iter().cloned());
        entries.push(entry);
        Self(entries)
    }

    /// Returns a new log without repeated entries, keeping the first
    /// occurrence of each.
    ///
    /// Entries are keyed by identifier, or by timestamp, kind, user and
    /// description when the identifier is empty.
    #[must_use]
    pub fn dedupe(&self) -> Self {
        let mut seen = HashSet::with_capacity(self.0.len());
        Self(
            self.0
                .iter()
                .filter(|entry| seen.insert(entry.dedupe_key()))
                .cloned()
                .collect(),
        )
    }

    /// Returns the entries newest first, for display.
    ///
    /// Entries sharing a timestamp keep their relative stored order.
    #[must_use]
    pub fn sorted_descending(&self) -> Vec<&ActivityEntry> {
        let mut entries: Vec<&ActivityEntry> = self.0.iter().collect();
        entries.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        entries
    }

    /// Returns the entries in stored order.
    #[must_use]
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.0
    }

    /// Iterates entries in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, ActivityEntry> {
        self.0.iter()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the log has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ActivityLog {
    type Item = &'a ActivityEntry;
    type IntoIter = std::slice::Iter<'a, ActivityEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
