//! Unit tests for the aggregation routine and its payload contract.

use crate::identity::domain::UserId;
use crate::stats::domain::{ScopeStats, StatusBreakdown, UserStats, scope_payload};
use crate::task::domain::{PersistedTaskData, Task, TaskId, TaskStatus};
use chrono::Duration;
use eyre::ensure;
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use serde_json::json;

fn task_with_status(status: TaskStatus, is_changed: bool) -> Task {
    let now = DefaultClock.utc();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        problem: "Routine assignment".to_owned(),
        reason: None,
        event: None,
        deadline: now + Duration::days(5),
        boss: UserId::new(),
        employee: UserId::new(),
        status,
        financial_help: false,
        is_active: true,
        is_changed,
        created_at: now,
        updated_at: now,
    })
}

fn ten_task_collection() -> Vec<Task> {
    let mut tasks = Vec::new();
    tasks.extend((0..4).map(|_| task_with_status(TaskStatus::Doing, false)));
    tasks.extend((0..3).map(|_| task_with_status(TaskStatus::Finished, false)));
    tasks.extend((0..2).map(|_| task_with_status(TaskStatus::Canceled, false)));
    tasks.push(task_with_status(TaskStatus::Missed, false));
    tasks
}

#[rstest]
fn breakdown_counts_statuses_and_dirty_flags() {
    let mut tasks = ten_task_collection();
    tasks.push(task_with_status(TaskStatus::Doing, true));

    let breakdown = StatusBreakdown::from_tasks(&tasks);
    assert_eq!(breakdown.total, 11);
    assert_eq!(breakdown.doing, 5);
    assert_eq!(breakdown.finished, 3);
    assert_eq!(breakdown.canceled, 2);
    assert_eq!(breakdown.missed, 1);
    assert_eq!(breakdown.changed, 1);
}

#[rstest]
fn percentages_are_raw_quotients() -> eyre::Result<()> {
    let tasks = ten_task_collection();
    let breakdown = StatusBreakdown::from_tasks(&tasks);
    let Some(stats) = ScopeStats::from_breakdown(&breakdown) else {
        eyre::bail!("ten tasks must yield a payload");
    };

    ensure!(stats.p_doing == 40.0);
    ensure!(stats.p_finished == 30.0);
    ensure!(stats.p_canceled == 20.0);
    ensure!(stats.p_missed == 10.0);
    ensure!(stats.p_changed == 0.0);
    Ok(())
}

#[rstest]
fn empty_scope_serializes_as_empty_object() -> eyre::Result<()> {
    let breakdown = StatusBreakdown::from_tasks(&[]);
    ensure!(breakdown.is_empty());
    let stats = ScopeStats::from_breakdown(&breakdown);
    ensure!(stats.is_none());
    ensure!(scope_payload(stats.as_ref())? == json!({}));
    Ok(())
}

#[rstest]
fn empty_user_scope_zeroes_every_metric() -> eyre::Result<()> {
    let stats = UserStats::from_breakdown(&StatusBreakdown::from_tasks(&[]));
    ensure!(stats == UserStats::empty());
    ensure!(stats.total == 0);
    ensure!(stats.p_doing == 0.0);

    let payload = serde_json::to_value(&stats)?;
    ensure!(payload.get("total") == Some(&json!(0)));
    ensure!(payload.get("changed") == Some(&json!(0.0)));
    Ok(())
}

#[rstest]
fn scope_payload_uses_the_exact_key_names() -> eyre::Result<()> {
    let breakdown = StatusBreakdown::from_tasks(&ten_task_collection());
    let stats = ScopeStats::from_breakdown(&breakdown);
    let payload = scope_payload(stats.as_ref())?;

    let Some(object) = payload.as_object() else {
        eyre::bail!("scope payload must be an object");
    };
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    ensure!(
        keys == vec![
            "canceled",
            "changed",
            "doing",
            "finished",
            "missed",
            "p_canceled",
            "p_changed",
            "p_doing",
            "p_finished",
            "p_missed",
        ]
    );
    ensure!(object.get("doing") == Some(&json!(4)));
    ensure!(object.get("p_doing") == Some(&json!(40.0)));
    Ok(())
}

#[rstest]
fn sector_variants_attach_name_and_total() -> eyre::Result<()> {
    let breakdown = StatusBreakdown::from_tasks(&ten_task_collection());
    let Some(stats) = ScopeStats::from_breakdown(&breakdown) else {
        eyre::bail!("ten tasks must yield a payload");
    };
    let stats = stats.with_sector("Logistics").with_task_total(breakdown.total);

    let payload = serde_json::to_value(&stats)?;
    ensure!(payload.get("sector") == Some(&json!("Logistics")));
    ensure!(payload.get("all_tasks") == Some(&json!(10)));
    Ok(())
}

#[rstest]
fn user_payload_keeps_the_historical_changed_percent_key() -> eyre::Result<()> {
    let mut tasks = ten_task_collection();
    tasks.push(task_with_status(TaskStatus::Doing, true));
    let stats = UserStats::from_breakdown(&StatusBreakdown::from_tasks(&tasks));

    let payload = serde_json::to_value(&stats)?;
    let Some(object) = payload.as_object() else {
        eyre::bail!("user payload must be an object");
    };
    // The changed-percent hides under the count-style key; there is no
    // `p_changed` in the user-scoped payload.
    ensure!(object.get("p_changed").is_none());
    ensure!(object.get("changed") == Some(&json!(100.0 / 11.0)));
    ensure!(object.get("total") == Some(&json!(11)));
    Ok(())
}
