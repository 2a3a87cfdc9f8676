//! Given steps for task ownership BDD scenarios.

use super::world::{TaskOwnershipWorld, parse_status, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskdesk::task::{domain::UserId, services::TaskDetailsRequest};

#[given(r#"a user named "{name}""#)]
fn user_named(world: &mut TaskOwnershipWorld, name: String) {
    world.users.insert(name, UserId::random());
}

#[given(r#""{name}" has created a task titled "{title}""#)]
fn user_has_created_task(
    world: &mut TaskOwnershipWorld,
    name: String,
    title: String,
) -> Result<(), eyre::Report> {
    let owner = world.user(&name)?;
    let created = run_async(world.service.create(owner, TaskDetailsRequest::new(title)))
        .wrap_err("create task in scenario setup")?;
    world.remember(created);
    Ok(())
}

#[given(r#""{name}" has marked "{title}" as "{status}""#)]
fn user_has_marked_task(
    world: &mut TaskOwnershipWorld,
    name: String,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let acting_user = world.user(&name)?;
    let target = parse_status(&status)?;
    let task_id = world
        .tasks_by_title
        .get(&title)
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("no task titled '{title}' in scenario world"))?;

    run_async(world.service.update_status(task_id, acting_user, target))
        .wrap_err("update task status in scenario setup")?;
    Ok(())
}
