//! In-memory integration tests for task lifecycle operations.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};
use taskdesk::task::{
    adapters::{
        memory::InMemoryTaskRepository,
        wire::{StatusPayload, TaskListQuery, TaskPayload, TaskView},
    },
    domain::{Task, TaskFilter, TaskId, TaskStatus, UserId},
    ports::DeleteOutcome,
    services::{TaskErrorKind, TaskLifecycleService},
};

type TestService = TaskLifecycleService<InMemoryTaskRepository<DefaultClock>>;

#[fixture]
fn service() -> TestService {
    TaskLifecycleService::new(Arc::new(InMemoryTaskRepository::new(DefaultClock)))
}

/// Creates a task from a raw JSON body, as an HTTP adapter would.
///
/// # Errors
///
/// Returns an error if the body is rejected or the service fails.
async fn create_from_json(
    service: &TestService,
    owner: UserId,
    body: &str,
) -> Result<Task, eyre::Report> {
    let request = TaskPayload::from_json(body.as_bytes())?.into_request()?;
    Ok(service.create(owner, request).await?)
}

/// Asserts the listing holds exactly the expected task identifiers in order.
///
/// # Errors
///
/// Returns an error if the identifiers differ.
fn assert_listed(found: &[Task], expected: &[TaskId]) -> Result<(), eyre::Report> {
    let ids: Vec<TaskId> = found.iter().map(Task::id).collect();
    eyre::ensure!(ids == expected, "expected {expected:?}, listed {ids:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_through_wire_types(service: TestService) -> Result<(), eyre::Report> {
    let owner = UserId::random();
    let created = create_from_json(
        &service,
        owner,
        r#"{"title":"Book venue","description":"Seats for 40","date":1781049600}"#,
    )
    .await?;
    eyre::ensure!(created.status() == TaskStatus::New, "new task must be NEW");

    let status = StatusPayload::from_json(br#"{"status":"IN_PROGRESS"}"#)?.status;
    service.update_status(created.id(), owner, status).await?;

    let query = TaskListQuery {
        status: Some("IN_PROGRESS".to_owned()),
        date: Some("2026-06-10".to_owned()),
    };
    let listed = service.find_all(owner, &query.into_filter()?).await?;
    assert_listed(&listed, &[created.id()])?;

    let edit = TaskPayload::from_json(br#"{"title":"Book bigger venue"}"#)?.into_request()?;
    let edited = service.update_details(created.id(), owner, edit).await?;
    eyre::ensure!(
        edited.status() == TaskStatus::InProgress,
        "editing details must keep the status"
    );

    let views = TaskView::collection(&[edited]);
    let rendered = serde_json::to_value(&views)?;
    eyre::ensure!(
        rendered.pointer("/0/title").and_then(|value| value.as_str())
            == Some("Book bigger venue"),
        "rendered title mismatch: {rendered}"
    );

    let outcome = service.delete_owned(created.id(), owner).await?;
    eyre::ensure!(outcome == DeleteOutcome::Deleted, "delete must report Deleted");
    let remaining = service.find_all(owner, &TaskFilter::new()).await?;
    assert_listed(&remaining, &[])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owners_only_see_their_own_tasks(service: TestService) -> Result<(), eyre::Report> {
    let alice = UserId::random();
    let bob = UserId::random();
    let alice_task = create_from_json(&service, alice, r#"{"title":"Alice's"}"#).await?;
    let bob_task = create_from_json(&service, bob, r#"{"title":"Bob's"}"#).await?;

    assert_listed(
        &service.find_all(alice, &TaskFilter::new()).await?,
        &[alice_task.id()],
    )?;
    assert_listed(
        &service.find_all(bob, &TaskFilter::new()).await?,
        &[bob_task.id()],
    )?;

    let denied = service
        .update_status(bob_task.id(), alice, TaskStatus::Complete)
        .await;
    eyre::ensure!(
        denied.as_ref().err().map(|err| err.kind()) == Some(TaskErrorKind::Forbidden),
        "cross-user status change must be forbidden: {denied:?}"
    );
    let unchanged = service.find(bob_task.id()).await?;
    eyre::ensure!(unchanged.status() == TaskStatus::New, "status must be unchanged");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_yield_distinct_identifiers(
    service: TestService,
) -> Result<(), eyre::Report> {
    let owner = UserId::random();
    let mut handles = Vec::new();
    for index in 0..16 {
        let worker = service.clone();
        handles.push(tokio::spawn(async move {
            let body = format!(r#"{{"title":"Task {index}"}}"#);
            let request = TaskPayload::from_json(body.as_bytes())?.into_request()?;
            Ok::<_, eyre::Report>(worker.create(owner, request).await?)
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await??.id());
    }
    ids.sort();
    ids.dedup();
    eyre::ensure!(ids.len() == 16, "identifiers must be unique");

    let listed = service.find_all(owner, &TaskFilter::new()).await?;
    eyre::ensure!(listed.len() == 16, "all tasks must be listed");
    Ok(())
}

#[rstest]
fn malformed_list_query_is_rejected_before_the_service() -> Result<(), eyre::Report> {
    let query = TaskListQuery {
        status: None,
        date: Some("2026-6-1".to_owned()),
    };

    let result = query.into_filter();

    eyre::ensure!(result.is_err(), "short date must be rejected");
    Ok(())
}
