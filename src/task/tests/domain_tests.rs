//! Domain-focused tests for task creation and editing.

use crate::identity::domain::UserId;
use crate::task::domain::{NewTaskData, Task, TaskDomainError, TaskEdit, TaskStatus};
use chrono::{DateTime, Duration, Utc};
use eyre::ensure;
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

fn in_days(days: i64) -> DateTime<Utc> {
    DefaultClock.utc() + Duration::days(days)
}

fn new_task_data(deadline: DateTime<Utc>) -> NewTaskData {
    NewTaskData {
        problem: "  Prepare the quarterly report  ".to_owned(),
        reason: Some("Board meeting".to_owned()),
        event: None,
        deadline,
        boss: UserId::new(),
        employee: UserId::new(),
    }
}

#[fixture]
fn task() -> Result<Task, TaskDomainError> {
    Task::new(new_task_data(in_days(5)), &DefaultClock)
}

#[rstest]
fn new_task_starts_doing_and_active(task: Result<Task, TaskDomainError>) -> eyre::Result<()> {
    let task = task?;
    ensure!(task.status() == TaskStatus::Doing);
    ensure!(task.is_active());
    ensure!(!task.is_changed());
    ensure!(!task.financial_help());
    ensure!(task.problem() == "Prepare the quarterly report");
    ensure!(task.reason() == Some("Board meeting"));
    ensure!(task.event().is_none());
    ensure!(task.created_at() == task.updated_at());
    Ok(())
}

#[rstest]
fn new_task_rejects_blank_problem() {
    let data = NewTaskData {
        problem: "   ".to_owned(),
        ..new_task_data(in_days(5))
    };
    assert_eq!(
        Task::new(data, &DefaultClock),
        Err(TaskDomainError::EmptyProblem)
    );
}

#[rstest]
fn deadline_today_is_rejected_tomorrow_is_accepted() -> eyre::Result<()> {
    let today = Task::new(new_task_data(in_days(0)), &DefaultClock);
    ensure!(matches!(
        today,
        Err(TaskDomainError::DeadlineNotInFuture { .. })
    ));

    let tomorrow = Task::new(new_task_data(in_days(1)), &DefaultClock)?;
    ensure!(tomorrow.status() == TaskStatus::Doing);
    Ok(())
}

#[rstest]
fn day_counters_use_date_granularity(task: Result<Task, TaskDomainError>) -> eyre::Result<()> {
    let task = task?;
    ensure!(task.all_days() == 5);
    ensure!(task.remain_days(&DefaultClock) == 5);
    Ok(())
}

#[rstest]
fn edit_applies_only_set_fields(task: Result<Task, TaskDomainError>) -> eyre::Result<()> {
    let mut task = task?;
    task.edit(
        TaskEdit {
            problem: Some("Prepare the annual report".to_owned()),
            deadline: Some(in_days(10)),
            ..TaskEdit::default()
        },
        &DefaultClock,
    )?;

    ensure!(task.problem() == "Prepare the annual report");
    ensure!(task.all_days() == 10);
    ensure!(task.reason() == Some("Board meeting"));
    ensure!(task.updated_at() >= task.created_at());
    Ok(())
}

#[rstest]
fn edit_rejects_blank_problem_replacement(
    task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = task?;
    let result = task.edit(
        TaskEdit {
            problem: Some(" ".to_owned()),
            ..TaskEdit::default()
        },
        &DefaultClock,
    );
    ensure!(result == Err(TaskDomainError::EmptyProblem));
    ensure!(task.problem() == "Prepare the quarterly report");
    Ok(())
}

#[rstest]
fn edit_revalidates_deadline_against_edit_date(
    task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = task?;
    let result = task.edit(
        TaskEdit {
            deadline: Some(in_days(0)),
            ..TaskEdit::default()
        },
        &DefaultClock,
    );
    ensure!(matches!(
        result,
        Err(TaskDomainError::DeadlineNotInFuture { .. })
    ));
    Ok(())
}

#[rstest]
fn edit_clears_blank_optional_texts(task: Result<Task, TaskDomainError>) -> eyre::Result<()> {
    let mut task = task?;
    task.edit(
        TaskEdit {
            reason: Some("  ".to_owned()),
            ..TaskEdit::default()
        },
        &DefaultClock,
    )?;
    ensure!(task.reason().is_none());
    Ok(())
}

#[rstest]
fn deactivate_soft_deletes(task: Result<Task, TaskDomainError>) -> eyre::Result<()> {
    let mut task = task?;
    task.deactivate(&DefaultClock);
    ensure!(!task.is_active());
    Ok(())
}
