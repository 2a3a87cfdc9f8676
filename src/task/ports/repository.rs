//! Repository port for task persistence with soft-delete semantics.
//!
//! Every operation treats soft-deleted rows as absent: they are never
//! returned, updated or deleted a second time.

use crate::task::domain::{NewTask, Task, TaskFilter, TaskId, TaskStatus, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Outcome of a soft-delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A live task was marked as deleted.
    Deleted,
    /// No live task matched: the identifier is unknown or already deleted.
    NothingToDelete,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a new task and returns it with its generated identifier and
    /// timestamps. The stored status is always [`TaskStatus::New`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on constraint or
    /// connectivity failure.
    async fn store(&self, draft: &NewTask) -> TaskRepositoryResult<Task>;

    /// Finds a live task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no live task has the
    /// identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Task>;

    /// Returns the owner's live tasks matching `filter`, oldest first.
    ///
    /// An empty vector is returned when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on storage failure.
    async fn find_all(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Overwrites title, description and date of the live task with
    /// `task.id()`, refreshes the modification timestamp and returns the
    /// stored record. Owner, identifier, status and creation time are never
    /// written; status changes go through [`Self::update_status`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task is absent or
    /// soft-deleted.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task>;

    /// Marks the live task as deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on storage failure.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<DeleteOutcome>;

    /// Updates only the status and modification timestamp, then returns the
    /// full record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task is absent or
    /// soft-deleted.
    async fn update_status(&self, id: TaskId, status: TaskStatus) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// No live task has the identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
