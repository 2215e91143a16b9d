//! Service orchestration tests for the reporting scopes.

use std::sync::Arc;

use crate::identity::{
    adapters::memory::{InMemorySectorRepository, InMemoryUserRepository},
    domain::{Role, Sector, SectorId, SectorName, User, UserId, UserProfile, Username},
    ports::{SectorRepository, UserRepository},
};
use crate::stats::services::{StatsError, StatsService};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{PersistedTaskData, Task, TaskId, TaskStatus},
    ports::TaskRepository,
};
use chrono::Duration;
use eyre::{bail, ensure};
use mockable::{Clock, DefaultClock};

type TestService =
    StatsService<InMemoryTaskRepository, InMemoryUserRepository, InMemorySectorRepository>;

struct Fixture {
    service: TestService,
    tasks: Arc<InMemoryTaskRepository>,
    director: User,
    manager: User,
    employee_a: User,
    sector_a: Sector,
    sector_b: Sector,
    empty_sector: Sector,
}

fn stored_task(boss: &User, employee: &User, status: TaskStatus, is_active: bool) -> Task {
    let now = DefaultClock.utc();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        problem: "Routine assignment".to_owned(),
        reason: None,
        event: None,
        deadline: now + Duration::days(5),
        boss: boss.id(),
        employee: employee.id(),
        status,
        financial_help: false,
        is_active,
        is_changed: false,
        created_at: now,
        updated_at: now,
    })
}

async fn setup() -> eyre::Result<Fixture> {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let sectors = Arc::new(InMemorySectorRepository::new());
    let service = StatsService::new(Arc::clone(&tasks), Arc::clone(&users), Arc::clone(&sectors));

    let sector_a = Sector::new(SectorName::new("logistics")?);
    let sector_b = Sector::new(SectorName::new("marketing")?);
    let empty_sector = Sector::new(SectorName::new("archive")?);
    for sector in [&sector_a, &sector_b, &empty_sector] {
        sectors.store(sector).await?;
    }

    let clock = DefaultClock;
    let admin = User::new(Username::new("root")?, Role::Admin, None, &clock)?;
    let director = User::new(Username::new("head")?, Role::Director, None, &clock)?;
    let manager = User::new(Username::new("olim")?, Role::Manager, Some(sector_a.id()), &clock)?;
    let employee_a =
        User::new(Username::new("karim")?, Role::Employee, Some(sector_a.id()), &clock)?
            .with_profile(UserProfile::new().with_first_name("karim").with_last_name("rashidov"));
    let employee_b =
        User::new(Username::new("aziz")?, Role::Employee, Some(sector_b.id()), &clock)?;
    for user in [&admin, &director, &manager, &employee_a, &employee_b] {
        users.store(user).await?;
    }

    // Leadership-assigned collection: one doing task in sector A, one
    // finished task in sector B. The manager-assigned and inactive tasks
    // stay out of the global and sector scopes.
    tasks
        .store(&stored_task(&director, &employee_a, TaskStatus::Doing, true))
        .await?;
    tasks
        .store(&stored_task(&admin, &employee_b, TaskStatus::Finished, true))
        .await?;
    tasks
        .store(&stored_task(&manager, &employee_a, TaskStatus::Doing, true))
        .await?;
    tasks
        .store(&stored_task(&director, &employee_a, TaskStatus::Finished, false))
        .await?;

    Ok(Fixture {
        service,
        tasks,
        director,
        manager,
        employee_a,
        sector_a,
        sector_b,
        empty_sector,
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn global_scope_covers_active_leadership_tasks() -> eyre::Result<()> {
    let fx = setup().await?;
    let Some(stats) = fx.service.global().await? else {
        bail!("expected a non-empty global scope");
    };

    ensure!(stats.doing == 1);
    ensure!(stats.finished == 1);
    ensure!(stats.p_doing == 50.0);
    ensure!(stats.p_finished == 50.0);
    ensure!(stats.sector.is_none());
    ensure!(stats.all_tasks.is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn single_sector_scope_carries_the_collection_size() -> eyre::Result<()> {
    let fx = setup().await?;
    let Some(stats) = fx.service.sector(fx.sector_a.id()).await? else {
        bail!("expected sector A to have stats");
    };
    ensure!(stats.all_tasks == Some(1));
    ensure!(stats.doing == 1);
    ensure!(stats.p_doing == 100.0);

    let missing = fx.service.sector(SectorId::new()).await;
    ensure!(matches!(missing, Err(StatsError::SectorNotFound(_))));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn all_sectors_report_skips_stats_for_empty_sectors() -> eyre::Result<()> {
    let fx = setup().await?;
    let reports = fx.service.all_sectors().await?;
    ensure!(reports.len() == 3);

    for report in &reports {
        if report.sector.id() == fx.empty_sector.id() {
            ensure!(report.stats.is_none());
        } else if report.sector.id() == fx.sector_b.id() {
            let Some(stats) = &report.stats else {
                bail!("expected sector B to have stats");
            };
            ensure!(stats.sector.as_deref() == Some("Marketing"));
            ensure!(stats.finished == 1);
            ensure!(stats.p_finished == 100.0);
        } else {
            ensure!(report.sector.id() == fx.sector_a.id());
            ensure!(report.stats.is_some());
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn user_scope_counts_every_assigned_task() -> eyre::Result<()> {
    let fx = setup().await?;
    let stats = fx.service.user(fx.employee_a.id()).await?;

    // Assigned-task collection ignores the active flag and the assigner's
    // role: doing (director) + doing (manager) + finished (inactive).
    ensure!(stats.total == 3);
    ensure!(stats.doing == 2);
    ensure!(stats.finished == 1);
    ensure!(stats.p_doing == 2.0 * 100.0 / 3.0);

    let missing = fx.service.user(UserId::new()).await;
    ensure!(matches!(missing, Err(StatsError::UserNotFound(_))));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn director_scope_is_always_zero() -> eyre::Result<()> {
    let fx = setup().await?;
    // Even a task assigned to the director personally is not counted.
    fx.tasks
        .store(&stored_task(&fx.manager, &fx.director, TaskStatus::Doing, true))
        .await?;

    let stats = fx.service.user(fx.director.id()).await?;
    ensure!(stats.total == 0);
    ensure!(stats.doing == 0);
    ensure!(stats.p_doing == 0.0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn sector_employee_listing_flattens_metrics() -> eyre::Result<()> {
    let fx = setup().await?;
    let reports = fx.service.sector_employees(fx.sector_a.id()).await?;

    ensure!(reports.len() == 1);
    let Some(report) = reports.first() else {
        bail!("expected one employee entry");
    };
    ensure!(report.user == fx.employee_a.id());
    ensure!(report.first_name == "Karim");
    ensure!(report.last_name == "Rashidov");
    ensure!(report.stats.total == 3);

    let payload = serde_json::to_value(report)?;
    ensure!(payload.get("total").is_some());
    ensure!(payload.get("p_doing").is_some());

    let missing = fx.service.sector_employees(SectorId::new()).await;
    ensure!(matches!(missing, Err(StatsError::SectorNotFound(_))));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn manager_and_user_listings_follow_role_filters() -> eyre::Result<()> {
    let fx = setup().await?;

    let managers = fx.service.managers().await?;
    ensure!(managers.len() == 1);
    ensure!(managers.first().is_some_and(|report| report.user == fx.manager.id()));

    let everyone = fx.service.all_users().await?;
    // Directors and admins are excluded from the all-users listing.
    ensure!(everyone.len() == 3);
    ensure!(everyone.iter().all(|report| report.user != fx.director.id()));
    Ok(())
}
