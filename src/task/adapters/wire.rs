//! Request and response shapes exchanged with outer adapters.
//!
//! These types decode client input into validated service requests and
//! render tasks into the client-facing representation. Malformed input is
//! rejected here, before any service call.

use crate::task::{
    domain::{
        Task, TaskDetails, TaskDomainError, TaskFilter, TaskId, TaskStatus, UserId, parse_day,
    },
    services::TaskDetailsRequest,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, TaskDomainError> {
    serde_json::from_slice(body).map_err(|err| TaskDomainError::MalformedPayload(err.to_string()))
}

/// Inbound task body used for creation and full updates.
///
/// Unknown fields such as `id`, `userId` or `status` are ignored, so a client
/// cannot set them through this payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskPayload {
    /// Required task title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional scheduled date as Unix epoch seconds.
    #[serde(default)]
    pub date: Option<i64>,
}

impl TaskPayload {
    /// Decodes a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MalformedPayload`] when the body is not a
    /// JSON object with a string `title`.
    pub fn from_json(body: &[u8]) -> Result<Self, TaskDomainError> {
        decode(body)
    }

    /// Converts the payload into a service request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title,
    /// [`TaskDomainError::TitleTooLong`] for an oversized one, or
    /// [`TaskDomainError::InvalidTimestamp`] when `date` is out of range.
    pub fn into_request(self) -> Result<TaskDetailsRequest, TaskDomainError> {
        TaskDetails::validate_title(&self.title)?;

        let mut request = TaskDetailsRequest::new(self.title);
        if let Some(description) = self.description {
            request = request.with_description(description);
        }
        if let Some(seconds) = self.date {
            let date = DateTime::<Utc>::from_timestamp(seconds, 0)
                .ok_or(TaskDomainError::InvalidTimestamp(seconds))?;
            request = request.with_date(date);
        }
        Ok(request)
    }
}

/// Inbound body for the status-update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatusPayload {
    /// Requested status.
    pub status: TaskStatus,
}

impl StatusPayload {
    /// Decodes a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MalformedPayload`] when the body is not
    /// valid JSON or names an unknown status. Status names are matched
    /// case-insensitively, as in [`TaskListQuery::into_filter`].
    pub fn from_json(body: &[u8]) -> Result<Self, TaskDomainError> {
        decode(body)
    }
}

/// Raw list query parameters. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskListQuery {
    /// Optional status name, e.g. `IN_PROGRESS`.
    #[serde(default)]
    pub status: Option<String>,
    /// Optional calendar day in `YYYY-MM-DD` form.
    #[serde(default)]
    pub date: Option<String>,
}

impl TaskListQuery {
    /// Validates the parameters into a [`TaskFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatus`] for an unknown status or
    /// [`TaskDomainError::InvalidDateFilter`] for a malformed date.
    pub fn into_filter(self) -> Result<TaskFilter, TaskDomainError> {
        let mut filter = TaskFilter::new();
        if let Some(raw) = self.status.as_deref().filter(|raw| !raw.is_empty()) {
            filter = filter.with_status(TaskStatus::try_from(raw)?);
        }
        if let Some(raw) = self.date.as_deref().filter(|raw| !raw.is_empty()) {
            filter = filter.with_day(parse_day(raw)?);
        }
        Ok(filter)
    }
}

/// Outbound task representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Owning user.
    pub user_id: UserId,
    /// Task title.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional scheduled date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: TaskStatus,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            user_id: task.user_id(),
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            date: task.date(),
            status: task.status(),
        }
    }
}

impl TaskView {
    /// Renders a list of tasks.
    #[must_use]
    pub fn collection(tasks: &[Task]) -> Vec<Self> {
        tasks.iter().map(Self::from).collect()
    }
}
