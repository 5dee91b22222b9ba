//! The acting user passed explicitly into every lifecycle operation.

use super::ParseUserRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the identifier is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Store manager; may delete completed tasks.
    Manager,
    /// Regular employee. Stored as `user`.
    #[serde(rename = "user")]
    Employee,
}

impl UserRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Employee => "user",
        }
    }
}

impl TryFrom<&str> for UserRole {
    type Error = ParseUserRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "user" | "employee" => Ok(Self::Employee),
            _ => Err(ParseUserRoleError(value.to_owned())),
        }
    }
}

/// The user performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Actor {
    id: UserId,
    name: String,
    role: UserRole,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: UserId::new(id),
            name: name.into(),
            role,
        }
    }

    /// Creates an actor with the employee role.
    #[must_use]
    pub fn employee(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, UserRole::Employee)
    }

    /// Creates an actor with the manager role.
    #[must_use]
    pub fn manager(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, UserRole::Manager)
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display name stamped into attribution and log entries.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the actor's role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns `true` when the actor holds the manager role.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        matches!(self.role, UserRole::Manager)
    }
}
