//! Enumerated task vocabulary: lifecycle status, priority and board.
//!
//! Each type has a strict `TryFrom<&str>` used where a caller supplies a
//! value on purpose, and a lenient `normalize` used when reading stored
//! records, which never fails.

use super::{ParseBoardError, ParsePriorityError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task has been created but nobody has started it.
    Todo,
    /// Task was paused and is waiting for someone to pick it up.
    NeedsPickup,
    /// Someone is working on the task.
    InProgress,
    /// Task is finished. Terminal.
    Completed,
}

impl TaskStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Todo,
        Self::NeedsPickup,
        Self::InProgress,
        Self::Completed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::NeedsPickup => "needs-pickup",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` for the terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Normalizes a raw stored status.
    ///
    /// Matching is case-insensitive and substring based so historical
    /// spellings such as `"In Progress"`, `"done"` or `"needs_pickup"` are
    /// recognised. Anything else, including a missing value, maps to
    /// [`TaskStatus::Todo`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        let value = raw.unwrap_or_default().to_ascii_lowercase();
        if value.contains("progress") {
            Self::InProgress
        } else if value.contains("completed") || value.contains("done") {
            Self::Completed
        } else if value.contains("pickup") {
            Self::NeedsPickup
        } else {
            Self::Todo
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "needs-pickup" => Ok(Self::NeedsPickup),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Regular work.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Normalizes a raw stored priority, defaulting to [`TaskPriority::Medium`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(|value| Self::try_from(value).ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// Work area a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    /// Front of the store (sales floor).
    #[default]
    Voorwinkel,
    /// Back of the store (warehouse, receiving).
    Achterwinkel,
}

impl Board {
    /// Both boards in display order.
    pub const ALL: [Self; 2] = [Self::Voorwinkel, Self::Achterwinkel];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Voorwinkel => "voorwinkel",
            Self::Achterwinkel => "achterwinkel",
        }
    }

    /// Normalizes a raw stored board.
    ///
    /// Only an exact `achterwinkel` selects the back store; every other
    /// value, including a missing one, falls back to [`Board::Voorwinkel`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("achterwinkel") => Self::Achterwinkel,
            _ => Self::Voorwinkel,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Board {
    type Error = ParseBoardError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "voorwinkel" => Ok(Self::Voorwinkel),
            "achterwinkel" => Ok(Self::Achterwinkel),
            _ => Err(ParseBoardError(value.to_owned())),
        }
    }
}
