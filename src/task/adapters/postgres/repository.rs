//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskFilter, TaskId, TaskStatus, UserId},
    ports::{DeleteOutcome, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::Clock;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Timestamps come from the injected clock so that both adapters stamp
/// records the same way.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository<C: Clock + Send + Sync> {
    pool: TaskPgPool,
    clock: C,
}

impl<C> PostgresTaskRepository<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool, clock: C) -> Self {
        Self { pool, clock }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl<C> TaskRepository for PostgresTaskRepository<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn store(&self, draft: &NewTask) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(draft, &self.clock);

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            let row = find_live_row(connection, id)?;
            row.ok_or(TaskRepositoryError::NotFound(id))
                .and_then(row_to_task)
        })
        .await
    }

    async fn find_all(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let status = filter.status();
        let window = filter.day_window();

        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::user_id.eq(owner.into_inner()))
                .filter(tasks::deleted_date.is_null())
                .into_boxed();

            if let Some(wanted) = status {
                query = query.filter(tasks::status.eq(wanted.as_str()));
            }
            if let Some(day) = window {
                query = query
                    .filter(tasks::date.ge(day.start()))
                    .filter(tasks::date.lt(day.end()));
            }

            let rows = query
                .order((tasks::created_date.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let id = task.id();
        let title = task.title().to_owned();
        let description = task.description().map(str::to_owned);
        let date = task.date();
        let updated_at = self.clock.utc();

        self.run_blocking(move |connection| {
            let row = diesel::update(
                tasks::table.filter(
                    tasks::id
                        .eq(id.into_inner())
                        .and(tasks::deleted_date.is_null()),
                ),
            )
            .set((
                tasks::title.eq(title),
                tasks::description.eq(description),
                tasks::date.eq(date),
                tasks::updated_date.eq(updated_at),
            ))
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(connection)
            .optional()
            .map_err(TaskRepositoryError::persistence)?;

            row.ok_or(TaskRepositoryError::NotFound(id))
                .and_then(row_to_task)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<DeleteOutcome> {
        let deleted_at = self.clock.utc();

        self.run_blocking(move |connection| {
            let deleted_count = diesel::update(
                tasks::table.filter(
                    tasks::id
                        .eq(id.into_inner())
                        .and(tasks::deleted_date.is_null()),
                ),
            )
            .set(tasks::deleted_date.eq(Some(deleted_at)))
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            Ok(if deleted_count == 0 {
                DeleteOutcome::NothingToDelete
            } else {
                DeleteOutcome::Deleted
            })
        })
        .await
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> TaskRepositoryResult<Task> {
        let updated_at = self.clock.utc();

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(
                tasks::table.filter(
                    tasks::id
                        .eq(id.into_inner())
                        .and(tasks::deleted_date.is_null()),
                ),
            )
            .set((
                tasks::status.eq(status.as_str()),
                tasks::updated_date.eq(updated_at),
            ))
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if updated_count == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }

            let row = find_live_row(connection, id)?;
            row.ok_or(TaskRepositoryError::NotFound(id))
                .and_then(row_to_task)
        })
        .await
    }
}

fn find_live_row(
    connection: &mut PgConnection,
    id: TaskId,
) -> TaskRepositoryResult<Option<TaskRow>> {
    tasks::table
        .filter(tasks::id.eq(id.into_inner()))
        .filter(tasks::deleted_date.is_null())
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)
}

fn to_new_row(draft: &NewTask, clock: &impl Clock) -> NewTaskRow {
    let timestamp = clock.utc();
    let details = draft.details();

    NewTaskRow {
        user_id: draft.owner().into_inner(),
        title: details.title().to_owned(),
        description: details.description().map(str::to_owned),
        date: details.date(),
        status: draft.status().as_str().to_owned(),
        created_date: timestamp,
        updated_date: timestamp,
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        user_id,
        title,
        description,
        date,
        status: persisted_status,
        created_date,
        updated_date,
        deleted_date,
    } = row;

    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        title,
        description,
        date,
        status,
        created_at: created_date,
        updated_at: updated_date,
        deleted_at: deleted_date,
    };
    Ok(Task::from_persisted(data))
}
