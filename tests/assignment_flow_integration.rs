//! Behavioural integration tests for the assignment workflow.
//!
//! These exercise the services together through the in-memory adapters,
//! following one organization from registration through task assignment,
//! lifecycle toggles, reviews, and the reporting scopes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use eyre::{bail, ensure};
use mockable::{Clock, DefaultClock};
use taskdesk::identity::{
    adapters::memory::{InMemorySectorRepository, InMemoryUserRepository},
    domain::{Role, User},
    services::{DirectoryService, RegisterUserRequest},
};
use taskdesk::review::{
    adapters::memory::InMemoryReviewRepository,
    services::{AddReviewRequest, ReviewService},
};
use taskdesk::stats::{domain::scope_payload, services::StatsService};
use taskdesk::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::TaskStatus,
    services::{CreateTaskRequest, TaskLifecycleService},
};

struct Backend {
    directory: DirectoryService<InMemoryUserRepository, InMemorySectorRepository, DefaultClock>,
    tasks: TaskLifecycleService<
        InMemoryTaskRepository,
        InMemoryUserRepository,
        InMemorySectorRepository,
        DefaultClock,
    >,
    reviews: ReviewService<InMemoryReviewRepository, InMemoryTaskRepository, DefaultClock>,
    stats: StatsService<InMemoryTaskRepository, InMemoryUserRepository, InMemorySectorRepository>,
}

fn backend() -> Backend {
    let users = Arc::new(InMemoryUserRepository::new());
    let sectors = Arc::new(InMemorySectorRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let reviews = Arc::new(InMemoryReviewRepository::new());
    let clock = Arc::new(DefaultClock);

    Backend {
        directory: DirectoryService::new(
            Arc::clone(&users),
            Arc::clone(&sectors),
            Arc::clone(&clock),
        ),
        tasks: TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&users),
            Arc::clone(&sectors),
            Arc::clone(&clock),
        ),
        reviews: ReviewService::new(Arc::clone(&reviews), Arc::clone(&tasks), Arc::clone(&clock)),
        stats: StatsService::new(tasks, users, sectors),
    }
}

fn in_days(days: i64) -> DateTime<Utc> {
    DefaultClock.utc() + Duration::days(days)
}

struct Organization {
    director: User,
    manager: User,
    employee: User,
}

async fn register_organization(backend: &Backend) -> eyre::Result<Organization> {
    let director = backend
        .directory
        .register_user(RegisterUserRequest::new("head", Role::Director))
        .await?;
    let sector = backend.directory.create_sector(&director, "logistics").await?;
    let manager = backend
        .directory
        .register_user(RegisterUserRequest::new("olim", Role::Manager).with_sector(sector.id()))
        .await?;
    let employee = backend
        .directory
        .register_user(RegisterUserRequest::new("karim", Role::Employee).with_sector(sector.id()))
        .await?;
    Ok(Organization {
        director,
        manager,
        employee,
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn assignment_lifecycle_from_registration_to_completion() -> eyre::Result<()> {
    let backend = backend();
    let org = register_organization(&backend).await?;

    // Manager assigns within the sector.
    let task = backend
        .tasks
        .create(
            &org.manager,
            CreateTaskRequest::new("Reconcile supplier invoices", in_days(7), org.employee.id())
                .with_reason("Month-end close"),
        )
        .await?;
    ensure!(task.boss() == org.manager.id());

    // The worker reports completion; the boss reopens and the worker
    // finishes again.
    let done = backend.tasks.finish(&org.employee, task.id()).await?;
    ensure!(done.task.status() == TaskStatus::Finished);
    ensure!(done.message() == "task completed");

    let reopened = backend.tasks.finish(&org.manager, task.id()).await?;
    ensure!(reopened.task.status() == TaskStatus::Doing);

    let done_again = backend.tasks.finish(&org.employee, task.id()).await?;
    ensure!(done_again.task.status() == TaskStatus::Finished);

    // Three toggles ran through the audited save path.
    let history = backend
        .tasks
        .update_history(&org.manager, task.id())
        .await?;
    ensure!(history.len() == 3);
    ensure!(
        history
            .iter()
            .all(|record| record.updated_by() == org.manager.id())
    );

    // Both parties discuss the result; the author alone can delete.
    let comment = backend
        .reviews
        .add(
            &org.employee,
            AddReviewRequest::new(task.id(), "Finished, totals attached"),
        )
        .await?;
    backend
        .reviews
        .add(
            &org.manager,
            AddReviewRequest::new(task.id(), "Approved").with_reply(comment.id()),
        )
        .await?;
    let thread = backend
        .reviews
        .list_for_task(&org.manager, task.id())
        .await?;
    ensure!(thread.len() == 2);
    ensure!(
        backend
            .reviews
            .remove(&org.manager, comment.id())
            .await
            .is_err()
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn reporting_scopes_reflect_the_assignment_split() -> eyre::Result<()> {
    let backend = backend();
    let org = register_organization(&backend).await?;

    // One manager-assigned and one director-assigned task; only the latter
    // counts toward the leadership scopes.
    backend
        .tasks
        .create(
            &org.manager,
            CreateTaskRequest::new("Sector-level errand", in_days(3), org.employee.id()),
        )
        .await?;
    let directed = backend
        .tasks
        .create(
            &org.director,
            CreateTaskRequest::new("Organization-wide audit", in_days(14), org.employee.id()),
        )
        .await?;
    backend.tasks.finish(&org.employee, directed.id()).await?;

    let Some(global) = backend.stats.global().await? else {
        bail!("expected a non-empty global scope");
    };
    ensure!(global.finished == 1);
    ensure!(global.doing == 0);
    ensure!(global.p_finished == 100.0);

    // The worker's own scope counts both assignments.
    let personal = backend.stats.user(org.employee.id()).await?;
    ensure!(personal.total == 2);
    ensure!(personal.doing == 1);
    ensure!(personal.finished == 1);
    ensure!(personal.p_finished == 50.0);

    // A director's personal scope stays empty by definition.
    let director_stats = backend.stats.user(org.director.id()).await?;
    ensure!(director_stats.total == 0);

    // Scope payloads collapse to `{}` once the collection empties.
    backend.tasks.remove(&org.director, directed.id()).await?;
    let empty = backend.stats.global().await?;
    ensure!(scope_payload(empty.as_ref())? == serde_json::json!({}));
    Ok(())
}
