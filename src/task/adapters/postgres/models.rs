//! Diesel row model for task storage.

use super::schema::tasks;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// One row of the `tasks` table, used for reads, inserts and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Raw lifecycle status.
    pub status: String,
    /// Raw priority.
    pub priority: String,
    /// Assigned user identifier.
    pub assigned_to: Option<String>,
    /// Assigned user display name.
    pub assigned_to_name: String,
    /// Raw board.
    pub board: String,
    /// Deadline.
    pub deadline: Option<NaiveDate>,
    /// Activity log JSON.
    pub activities: Value,
    /// First starter's identifier.
    pub started_by: Option<String>,
    /// First starter's display name.
    pub started_by_name: Option<String>,
    /// First start time.
    pub started_at: Option<DateTime<Utc>>,
    /// Latest picker's identifier.
    pub picked_up_by: Option<String>,
    /// Latest picker's display name.
    pub picked_up_by_name: Option<String>,
    /// Latest pickup time.
    pub picked_up_at: Option<DateTime<Utc>>,
    /// Completer's identifier.
    pub completed_by: Option<String>,
    /// Completer's display name.
    pub completed_by_name: Option<String>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
