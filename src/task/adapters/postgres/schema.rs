//! Diesel schema for task storage.

diesel::table! {
    /// Tasks with flattened attribution stamps and a JSON activity log.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Title.
        title -> Text,
        /// Description.
        description -> Text,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Assigned user identifier.
        assigned_to -> Nullable<Text>,
        /// Assigned user display name, empty when unassigned.
        assigned_to_name -> Text,
        /// Board the task belongs to.
        #[max_length = 50]
        board -> Varchar,
        /// Optional deadline.
        deadline -> Nullable<Date>,
        /// Activity log entries.
        activities -> Jsonb,
        /// First starter's identifier.
        started_by -> Nullable<Text>,
        /// First starter's display name.
        started_by_name -> Nullable<Text>,
        /// First start time.
        started_at -> Nullable<Timestamptz>,
        /// Latest picker's identifier.
        picked_up_by -> Nullable<Text>,
        /// Latest picker's display name.
        picked_up_by_name -> Nullable<Text>,
        /// Latest pickup time.
        picked_up_at -> Nullable<Timestamptz>,
        /// Completer's identifier.
        completed_by -> Nullable<Text>,
        /// Completer's display name.
        completed_by_name -> Nullable<Text>,
        /// Completion time.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp, used as the concurrency token.
        updated_at -> Timestamptz,
    }
}
