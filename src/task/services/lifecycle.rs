//! Service layer for task creation, lookup, modification and deletion.

use crate::task::{
    domain::{NewTask, Task, TaskDetails, TaskDomainError, TaskFilter, TaskId, TaskStatus, UserId},
    ports::{DeleteOutcome, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Request payload carrying the user-editable task fields.
///
/// Used for both creation and full updates. Owner, identifier and status are
/// not part of the request: the service supplies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailsRequest {
    title: String,
    description: Option<String>,
    date: Option<DateTime<Utc>>,
}

impl TaskDetailsRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            date: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the scheduled date.
    #[must_use]
    pub const fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    fn into_details(self) -> Result<TaskDetails, TaskDomainError> {
        Ok(TaskDetails::new(self.title)?
            .with_description(self.description)
            .with_date(self.date))
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The acting user does not own the task.
    #[error("access denied: user {user_id} does not own task {task_id}")]
    AccessDenied {
        /// Task the user attempted to access.
        task_id: TaskId,
        /// User who attempted the access.
        user_id: UserId,
    },
}

/// Client-facing classification of a [`TaskLifecycleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskErrorKind {
    /// Input was malformed.
    Validation,
    /// No live task matched.
    NotFound,
    /// The caller does not own the task.
    Forbidden,
    /// Storage or connectivity failure; details stay server-side.
    Internal,
}

impl TaskLifecycleError {
    /// Classifies the error for response mapping.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::Domain(_) => TaskErrorKind::Validation,
            Self::Repository(TaskRepositoryError::NotFound(_)) => TaskErrorKind::NotFound,
            Self::Repository(TaskRepositoryError::Persistence(_)) => TaskErrorKind::Internal,
            Self::AccessDenied { .. } => TaskErrorKind::Forbidden,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

fn log_failure(operation: &'static str, err: &TaskLifecycleError) {
    match err.kind() {
        TaskErrorKind::Internal => error!(operation, error = %err, "task operation failed"),
        TaskErrorKind::Validation | TaskErrorKind::NotFound | TaskErrorKind::Forbidden => {
            warn!(operation, error = %err, "task operation rejected");
        }
    }
}

fn ensure_owner(task: &Task, acting_user: UserId) -> TaskLifecycleResult<()> {
    if task.is_owned_by(acting_user) {
        return Ok(());
    }
    Err(TaskLifecycleError::AccessDenied {
        task_id: task.id(),
        user_id: acting_user,
    })
}

/// Task lifecycle orchestration service.
///
/// The acting user's identity is passed explicitly to every call that needs
/// it; the service never looks it up from ambient state.
pub struct TaskLifecycleService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> Clone for TaskLifecycleService<R>
where
    R: TaskRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> TaskLifecycleService<R>
where
    R: TaskRepository,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a task owned by `owner` with status [`TaskStatus::New`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the title is empty or the
    /// repository rejects persistence.
    pub async fn create(
        &self,
        owner: UserId,
        request: TaskDetailsRequest,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .store_new(owner, request)
            .await
            .inspect_err(|err| log_failure("create", err))?;
        debug!(task_id = %task.id(), user_id = %owner, "task created");
        Ok(task)
    }

    /// Finds a live task by identifier without an ownership check.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] with
    /// [`TaskRepositoryError::NotFound`] when no live task matches.
    pub async fn find(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("find", err))
    }

    /// Finds a live task the acting user owns.
    ///
    /// # Errors
    ///
    /// Returns a not-found repository error or
    /// [`TaskLifecycleError::AccessDenied`].
    pub async fn find_owned(
        &self,
        task_id: TaskId,
        acting_user: UserId,
    ) -> TaskLifecycleResult<Task> {
        self.fetch_owned(task_id, acting_user)
            .await
            .inspect_err(|err| log_failure("find_owned", err))
    }

    /// Lists the owner's live tasks matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find_all(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> TaskLifecycleResult<Vec<Task>> {
        self.repository
            .find_all(owner, filter)
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("find_all", err))
    }

    /// Persists title, description and date of `task` as given.
    ///
    /// Owner, identifier and status are never changed by this call; use
    /// [`Self::update_status`] to move a task between statuses.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the task is absent,
    /// soft-deleted, or persistence fails.
    pub async fn update(&self, task: &Task) -> TaskLifecycleResult<Task> {
        self.repository
            .update(task)
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("update", err))
    }

    /// Replaces title, description and date of a task the acting user owns.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty title, a not-found repository
    /// error, or [`TaskLifecycleError::AccessDenied`].
    pub async fn update_details(
        &self,
        task_id: TaskId,
        acting_user: UserId,
        request: TaskDetailsRequest,
    ) -> TaskLifecycleResult<Task> {
        self.replace_details(task_id, acting_user, request)
            .await
            .inspect_err(|err| log_failure("update_details", err))
    }

    /// Soft-deletes a task without an ownership check.
    ///
    /// [`DeleteOutcome::NothingToDelete`] is reported when the task is
    /// unknown or was already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn delete(&self, task_id: TaskId) -> TaskLifecycleResult<DeleteOutcome> {
        let outcome = self
            .repository
            .delete(task_id)
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("delete", err))?;

        if outcome == DeleteOutcome::NothingToDelete {
            debug!(task_id = %task_id, "delete matched no live task");
        }
        Ok(outcome)
    }

    /// Soft-deletes a task the acting user owns.
    ///
    /// # Errors
    ///
    /// Returns a not-found repository error when the task is unknown or
    /// already deleted, or [`TaskLifecycleError::AccessDenied`].
    pub async fn delete_owned(
        &self,
        task_id: TaskId,
        acting_user: UserId,
    ) -> TaskLifecycleResult<DeleteOutcome> {
        self.delete_checked(task_id, acting_user)
            .await
            .inspect_err(|err| log_failure("delete_owned", err))
    }

    /// Changes the status of a task after re-checking ownership.
    ///
    /// Only the status and modification timestamp are written, so concurrent
    /// edits to other fields are not overwritten.
    ///
    /// # Errors
    ///
    /// Returns a not-found repository error when no live task matches, or
    /// [`TaskLifecycleError::AccessDenied`] when `acting_user` is not the
    /// owner; the stored status is unchanged in both cases.
    pub async fn update_status(
        &self,
        task_id: TaskId,
        acting_user: UserId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .persist_status(task_id, acting_user, status)
            .await
            .inspect_err(|err| log_failure("update_status", err))?;
        debug!(task_id = %task.id(), status = %task.status(), "task status updated");
        Ok(task)
    }

    async fn store_new(
        &self,
        owner: UserId,
        request: TaskDetailsRequest,
    ) -> TaskLifecycleResult<Task> {
        let draft = NewTask::new(owner, request.into_details()?);
        Ok(self.repository.store(&draft).await?)
    }

    async fn replace_details(
        &self,
        task_id: TaskId,
        acting_user: UserId,
        request: TaskDetailsRequest,
    ) -> TaskLifecycleResult<Task> {
        let details = request.into_details()?;
        let mut task = self.fetch_owned(task_id, acting_user).await?;
        task.apply_details(details);
        Ok(self.repository.update(&task).await?)
    }

    async fn delete_checked(
        &self,
        task_id: TaskId,
        acting_user: UserId,
    ) -> TaskLifecycleResult<DeleteOutcome> {
        let task = self.fetch_owned(task_id, acting_user).await?;
        Ok(self.repository.delete(task.id()).await?)
    }

    /// Uses the repository's partial status update rather than a full
    /// `update`.
    async fn persist_status(
        &self,
        task_id: TaskId,
        acting_user: UserId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let task = self.fetch_owned(task_id, acting_user).await?;
        Ok(self.repository.update_status(task.id(), status).await?)
    }

    async fn fetch_owned(
        &self,
        task_id: TaskId,
        acting_user: UserId,
    ) -> TaskLifecycleResult<Task> {
        let task = self.repository.find_by_id(task_id).await?;
        ensure_owner(&task, acting_user)?;
        Ok(task)
    }
}
