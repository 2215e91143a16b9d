//! Service orchestration tests for review threads.

use std::sync::Arc;

use crate::identity::domain::{Role, SectorId, User, Username};
use crate::review::{
    adapters::memory::InMemoryReviewRepository,
    domain::{ReviewDomainError, ReviewId},
    services::{AddReviewRequest, ReviewService, ReviewServiceError},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{NewTaskData, Task, TaskId},
    ports::TaskRepository,
};
use chrono::Duration;
use eyre::{bail, ensure};
use mockable::{Clock, DefaultClock};

type TestService = ReviewService<InMemoryReviewRepository, InMemoryTaskRepository, DefaultClock>;

struct Fixture {
    service: TestService,
    boss: User,
    worker: User,
    outsider: User,
    task: Task,
    other_task: Task,
}

fn new_task(boss: &User, worker: &User) -> eyre::Result<Task> {
    let clock = DefaultClock;
    let task = Task::new(
        NewTaskData {
            problem: "Reconcile supplier invoices".to_owned(),
            reason: None,
            event: None,
            deadline: clock.utc() + Duration::days(4),
            boss: boss.id(),
            employee: worker.id(),
        },
        &clock,
    )?;
    Ok(task)
}

async fn setup() -> eyre::Result<Fixture> {
    let reviews = Arc::new(InMemoryReviewRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let service = ReviewService::new(Arc::clone(&reviews), Arc::clone(&tasks), Arc::new(DefaultClock));

    let clock = DefaultClock;
    let sector = SectorId::new();
    let boss = User::new(Username::new("olim")?, Role::Manager, Some(sector), &clock)?;
    let worker = User::new(Username::new("karim")?, Role::Employee, Some(sector), &clock)?;
    let outsider = User::new(Username::new("aziz")?, Role::Employee, Some(sector), &clock)?;

    let task = new_task(&boss, &worker)?;
    let other_task = new_task(&boss, &worker)?;
    tasks.store(&task).await?;
    tasks.store(&other_task).await?;

    Ok(Fixture {
        service,
        boss,
        worker,
        outsider,
        task,
        other_task,
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn add_forces_author_to_acting_user() -> eyre::Result<()> {
    let fx = setup().await?;
    let review = fx
        .service
        .add(
            &fx.worker,
            AddReviewRequest::new(fx.task.id(), "Done, see the attached summary"),
        )
        .await?;

    ensure!(review.author() == fx.worker.id());
    ensure!(review.task() == fx.task.id());
    ensure!(review.content().as_str() == "Done, see the attached summary");
    ensure!(review.reply().is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn add_rejects_blank_content() -> eyre::Result<()> {
    let fx = setup().await?;
    let result = fx
        .service
        .add(&fx.worker, AddReviewRequest::new(fx.task.id(), "   "))
        .await;
    ensure!(matches!(
        result,
        Err(ReviewServiceError::Domain(ReviewDomainError::EmptyContent))
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn add_is_gated_to_boss_or_worker() -> eyre::Result<()> {
    let fx = setup().await?;
    let denied = fx
        .service
        .add(&fx.outsider, AddReviewRequest::new(fx.task.id(), "Noted"))
        .await;
    ensure!(matches!(denied, Err(ReviewServiceError::Forbidden(_))));

    let missing = fx
        .service
        .add(&fx.worker, AddReviewRequest::new(TaskId::new(), "Noted"))
        .await;
    ensure!(matches!(missing, Err(ReviewServiceError::TaskNotFound(_))));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn replies_stay_within_one_task() -> eyre::Result<()> {
    let fx = setup().await?;
    let root = fx
        .service
        .add(&fx.worker, AddReviewRequest::new(fx.task.id(), "Finished early"))
        .await?;

    let reply = fx
        .service
        .add(
            &fx.boss,
            AddReviewRequest::new(fx.task.id(), "Good work").with_reply(root.id()),
        )
        .await?;
    ensure!(reply.reply() == Some(root.id()));

    let ghost = ReviewId::new();
    let missing = fx
        .service
        .add(
            &fx.boss,
            AddReviewRequest::new(fx.task.id(), "Orphan").with_reply(ghost),
        )
        .await;
    ensure!(matches!(
        missing,
        Err(ReviewServiceError::ReplyNotFound(id)) if id == ghost
    ));

    let crossed = fx
        .service
        .add(
            &fx.boss,
            AddReviewRequest::new(fx.other_task.id(), "Crossed").with_reply(root.id()),
        )
        .await;
    match crossed {
        Err(ReviewServiceError::ReplyOutsideTask { reply, task }) => {
            ensure!(reply == root.id());
            ensure!(task == fx.other_task.id());
        }
        other => bail!("expected cross-task reply rejection, got {other:?}"),
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_is_gated_and_ordered() -> eyre::Result<()> {
    let fx = setup().await?;
    let first = fx
        .service
        .add(&fx.worker, AddReviewRequest::new(fx.task.id(), "Starting now"))
        .await?;
    let second = fx
        .service
        .add(&fx.boss, AddReviewRequest::new(fx.task.id(), "Keep me posted"))
        .await?;

    let listed = fx.service.list_for_task(&fx.boss, fx.task.id()).await?;
    ensure!(listed.len() == 2);
    ensure!(listed.first().is_some_and(|review| review.id() == first.id()));
    ensure!(listed.get(1).is_some_and(|review| review.id() == second.id()));

    let denied = fx.service.list_for_task(&fx.outsider, fx.task.id()).await;
    ensure!(matches!(denied, Err(ReviewServiceError::Forbidden(_))));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn only_the_author_reads_edits_and_deletes() -> eyre::Result<()> {
    let fx = setup().await?;
    let review = fx
        .service
        .add(&fx.worker, AddReviewRequest::new(fx.task.id(), "First draft"))
        .await?;

    ensure!(fx.service.get(&fx.worker, review.id()).await.is_ok());
    let denied_read = fx.service.get(&fx.boss, review.id()).await;
    ensure!(matches!(denied_read, Err(ReviewServiceError::Forbidden(_))));

    let updated = fx
        .service
        .update_content(&fx.worker, review.id(), "Second draft")
        .await?;
    ensure!(updated.content().as_str() == "Second draft");
    ensure!(updated.updated_at() >= updated.created_at());

    let denied_delete = fx.service.remove(&fx.boss, review.id()).await;
    ensure!(matches!(denied_delete, Err(ReviewServiceError::Forbidden(_))));

    fx.service.remove(&fx.worker, review.id()).await?;
    let gone = fx.service.get(&fx.worker, review.id()).await;
    ensure!(matches!(gone, Err(ReviewServiceError::NotFound(_))));
    Ok(())
}
