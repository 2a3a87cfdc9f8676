//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskFilter, TaskId, TaskStatus, UserId},
    ports::{DeleteOutcome, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Soft-deleted tasks stay in the map with a deletion timestamp, mirroring
/// the relational adapter.
#[derive(Debug, Clone)]
pub struct InMemoryTaskRepository<C: Clock + Send + Sync> {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
    clock: C,
}

impl<C: Clock + Send + Sync> InMemoryTaskRepository<C> {
    /// Creates an empty repository stamping records with `clock`.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Returns the number of stored rows, including soft-deleted ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing has ever been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, HashMap<TaskId, Task>>> {
        self.tasks.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, HashMap<TaskId, Task>>> {
        self.tasks.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Applies `transform` to the live task with `id` and stores the result.
    fn modify_live<F>(&self, id: TaskId, transform: F) -> TaskRepositoryResult<Task>
    where
        F: FnOnce(&mut PersistedTaskData),
    {
        let mut tasks = self.write()?;
        let current = tasks
            .get(&id)
            .filter(|task| !task.is_deleted())
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let mut data = to_persisted(current);
        transform(&mut data);
        data.updated_at = self.clock.utc();

        let updated = Task::from_persisted(data);
        tasks.insert(id, updated.clone());
        Ok(updated)
    }
}

fn to_persisted(task: &Task) -> PersistedTaskData {
    PersistedTaskData {
        id: task.id(),
        user_id: task.user_id(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        date: task.date(),
        status: task.status(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        deleted_at: task.deleted_at(),
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> TaskRepository for InMemoryTaskRepository<C> {
    async fn store(&self, draft: &NewTask) -> TaskRepositoryResult<Task> {
        let mut tasks = self.write()?;
        let mut id = TaskId::new();
        while tasks.contains_key(&id) {
            id = TaskId::new();
        }

        let timestamp = self.clock.utc();
        let details = draft.details();
        let task = Task::from_persisted(PersistedTaskData {
            id,
            user_id: draft.owner(),
            title: details.title().to_owned(),
            description: details.description().map(str::to_owned),
            date: details.date(),
            status: draft.status(),
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        });
        tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        let tasks = self.read()?;
        tasks
            .get(&id)
            .filter(|task| !task.is_deleted())
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_all(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.read()?;
        let mut found: Vec<Task> = tasks
            .values()
            .filter(|task| !task.is_deleted() && task.is_owned_by(owner))
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        found.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(found)
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        self.modify_live(task.id(), |data| {
            data.title = task.title().to_owned();
            data.description = task.description().map(str::to_owned);
            data.date = task.date();
        })
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<DeleteOutcome> {
        let mut tasks = self.write()?;
        let Some(current) = tasks.get(&id).filter(|task| !task.is_deleted()) else {
            return Ok(DeleteOutcome::NothingToDelete);
        };

        let mut data = to_persisted(current);
        data.deleted_at = Some(self.clock.utc());
        tasks.insert(id, Task::from_persisted(data));
        Ok(DeleteOutcome::Deleted)
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> TaskRepositoryResult<Task> {
        self.modify_live(id, |data| data.status = status)
    }
}
