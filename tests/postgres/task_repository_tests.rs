//! `PostgreSQL` integration tests for task storage and soft deletion.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rstest::rstest;
use taskdesk::task::{
    domain::{NewTask, Task, TaskDetails, TaskFilter, TaskId, TaskStatus, UserId},
    ports::{DeleteOutcome, TaskRepository, TaskRepositoryError},
    services::{TaskDetailsRequest, TaskErrorKind},
};

use crate::postgres::helpers::{BoxError, TestDatabase, database, test_runtime};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<DateTime<Utc>, BoxError> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_else(|| "ambiguous timestamp".into())
}

fn draft(owner: UserId, title: &str, date: Option<DateTime<Utc>>) -> Result<NewTask, BoxError> {
    let details = TaskDetails::new(title)?.with_date(date);
    Ok(NewTask::new(owner, details))
}

fn ids(tasks: &[Task]) -> Vec<TaskId> {
    tasks.iter().map(Task::id).collect()
}

#[rstest]
fn postgres_store_assigns_identifier_and_round_trips(
    database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let repository = db.repository();
    let owner = UserId::random();
    let scheduled = at(2026, 8, 20, 14, 30)?;
    let details = TaskDetails::new("Renew passport")?
        .with_description(Some("Bring two photos".to_owned()))
        .with_date(Some(scheduled));

    let rt = test_runtime()?;
    let stored = rt.block_on(repository.store(&NewTask::new(owner, details)))?;
    let found = rt.block_on(repository.find_by_id(stored.id()))?;

    assert_eq!(found, stored);
    assert_eq!(found.user_id(), owner);
    assert_eq!(found.status(), TaskStatus::New);
    assert_eq!(found.title(), "Renew passport");
    assert_eq!(found.description(), Some("Bring two photos"));
    assert_eq!(found.date(), Some(scheduled));
    assert!(found.deleted_at().is_none());
    Ok(())
}

#[rstest]
fn postgres_accepts_the_longest_allowed_title(
    database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let repository = db.repository();
    let title = "é".repeat(TaskDetails::MAX_TITLE_CHARS);

    let rt = test_runtime()?;
    let stored = rt.block_on(repository.store(&draft(UserId::random(), &title, None)?))?;

    assert_eq!(stored.title(), title);
    Ok(())
}

#[rstest]
fn postgres_soft_delete_hides_but_keeps_the_row(
    database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let repository = db.repository();
    let owner = UserId::random();

    let rt = test_runtime()?;
    rt.block_on(async {
        let stored = repository.store(&draft(owner, "Ephemeral", None)?).await?;

        let first = repository.delete(stored.id()).await?;
        let second = repository.delete(stored.id()).await?;

        assert_eq!(first, DeleteOutcome::Deleted);
        assert_eq!(second, DeleteOutcome::NothingToDelete);
        assert!(matches!(
            repository.find_by_id(stored.id()).await,
            Err(TaskRepositoryError::NotFound(id)) if id == stored.id()
        ));
        assert!(matches!(
            repository.update(&stored).await,
            Err(TaskRepositoryError::NotFound(_))
        ));
        assert!(matches!(
            repository
                .update_status(stored.id(), TaskStatus::Complete)
                .await,
            Err(TaskRepositoryError::NotFound(_))
        ));
        assert!(repository.find_all(owner, &TaskFilter::new()).await?.is_empty());
        Ok::<(), BoxError>(())
    })?;
    assert_eq!(db.count_all_rows()?, 1);
    Ok(())
}

#[rstest]
fn postgres_find_all_scopes_filters_and_orders(
    database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let repository = db.repository();
    let owner = UserId::random();
    let stranger = UserId::random();

    test_runtime()?.block_on(async {
        let midnight = repository
            .store(&draft(owner, "Midnight", Some(at(2026, 9, 1, 0, 0)?))?)
            .await?;
        let evening = repository
            .store(&draft(owner, "Evening", Some(at(2026, 9, 1, 23, 59)?))?)
            .await?;
        let next_day = repository
            .store(&draft(owner, "Next day", Some(at(2026, 9, 2, 0, 0)?))?)
            .await?;
        let undated = repository.store(&draft(owner, "Undated", None)?).await?;
        repository
            .store(&draft(stranger, "Foreign", Some(at(2026, 9, 1, 12, 0)?))?)
            .await?;
        repository
            .update_status(evening.id(), TaskStatus::InProgress)
            .await?;

        let everything = repository.find_all(owner, &TaskFilter::new()).await?;
        let day = NaiveDate::from_ymd_opt(2026, 9, 1).ok_or("invalid day")?;
        let on_day = repository
            .find_all(owner, &TaskFilter::new().with_day(day))
            .await?;
        let in_progress_on_day = repository
            .find_all(
                owner,
                &TaskFilter::new()
                    .with_day(day)
                    .with_status(TaskStatus::InProgress),
            )
            .await?;

        assert_eq!(
            ids(&everything),
            vec![midnight.id(), evening.id(), next_day.id(), undated.id()]
        );
        assert_eq!(ids(&on_day), vec![midnight.id(), evening.id()]);
        assert_eq!(ids(&in_progress_on_day), vec![evening.id()]);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_update_persists_details_but_not_owner_or_status(
    database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let repository = db.repository();
    let owner = UserId::random();

    test_runtime()?.block_on(async {
        let stored = repository
            .store(&draft(owner, "Draft", Some(at(2026, 9, 5, 9, 0)?))?)
            .await?;
        let mut edited = stored.clone();
        edited.apply_details(TaskDetails::new("Final")?.with_description(Some("Done".to_owned())));
        edited.set_status(TaskStatus::Complete);

        let updated = repository.update(&edited).await?;
        let found = repository.find_by_id(stored.id()).await?;

        assert_eq!(found, updated);
        assert_eq!(found.title(), "Final");
        assert_eq!(found.description(), Some("Done"));
        assert_eq!(found.date(), None);
        assert_eq!(found.status(), TaskStatus::New);
        assert_eq!(found.user_id(), owner);
        assert_eq!(found.created_at(), stored.created_at());
        assert!(found.updated_at() >= stored.updated_at());
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_detail_edit_keeps_an_earlier_status_change(
    database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let repository = db.repository();

    test_runtime()?.block_on(async {
        let stored = repository.store(&draft(UserId::random(), "Shared", None)?).await?;
        let mut stale = stored.clone();
        stale.apply_details(TaskDetails::new("Renamed")?);

        repository
            .update_status(stored.id(), TaskStatus::Complete)
            .await?;
        let updated = repository.update(&stale).await?;

        assert_eq!(updated.title(), "Renamed");
        assert_eq!(updated.status(), TaskStatus::Complete);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_status_update_is_owner_checked_and_partial(
    database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let service = db.service();
    let owner = UserId::random();

    test_runtime()?.block_on(async {
        let created = service
            .create(
                owner,
                TaskDetailsRequest::new("Guarded").with_description("Keep me"),
            )
            .await?;

        let denied = service
            .update_status(created.id(), UserId::random(), TaskStatus::Complete)
            .await;
        let accepted = service
            .update_status(created.id(), owner, TaskStatus::InProgress)
            .await?;

        assert_eq!(
            denied.err().map(|err| err.kind()),
            Some(TaskErrorKind::Forbidden)
        );
        assert_eq!(accepted.status(), TaskStatus::InProgress);
        assert_eq!(accepted.title(), "Guarded");
        assert_eq!(accepted.description(), Some("Keep me"));
        Ok::<(), BoxError>(())
    })
}
