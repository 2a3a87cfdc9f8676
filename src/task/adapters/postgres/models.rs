//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub user_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional scheduled date.
    pub date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_date: DateTime<Utc>,
    /// Soft-delete timestamp.
    pub deleted_date: Option<DateTime<Utc>>,
}

/// Insert model for task records. The identifier is left to the column
/// default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Owning user identifier.
    pub user_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional scheduled date.
    pub date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_date: DateTime<Utc>,
}
