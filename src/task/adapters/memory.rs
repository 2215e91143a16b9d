//! In-memory repository for task lifecycle tests and default wiring.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::task::{
    domain::{Task, TaskId, TaskStatus, TaskUpdateRecord},
    ports::{
        SortDirection, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TaskSortKey,
    },
};

/// Thread-safe in-memory task repository.
///
/// All mutations of one task run under a single write lock, so a save and
/// its update-log append are atomic, and `update_transition` observes
/// compare-and-swap semantics.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    update_log: Vec<TaskUpdateRecord>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(query: &TaskQuery, task: &Task) -> bool {
    query.boss.is_none_or(|boss| task.boss() == boss)
        && query
            .bosses_in
            .as_ref()
            .is_none_or(|ids| ids.contains(&task.boss()))
        && query
            .bosses_not_in
            .as_ref()
            .is_none_or(|ids| !ids.contains(&task.boss()))
        && query.employee.is_none_or(|employee| task.employee() == employee)
        && query
            .employees_in
            .as_ref()
            .is_none_or(|ids| ids.contains(&task.employee()))
        && query.status.is_none_or(|status| task.status() == status)
        && (!query.active_only || task.is_active())
        && query
            .created_from
            .is_none_or(|date| task.created_at().date_naive() >= date)
        && query
            .created_to
            .is_none_or(|date| task.created_at().date_naive() <= date)
}

fn compare(key: TaskSortKey, a: &Task, b: &Task) -> Ordering {
    match key {
        TaskSortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
        TaskSortKey::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        TaskSortKey::Deadline => a.deadline().cmp(&b.deadline()),
        TaskSortKey::Status => a.status().as_str().cmp(b.status().as_str()),
    }
}

fn append_record(state: &mut InMemoryTaskState, task: &Task, updated_by: UserId) {
    state.update_log.push(TaskUpdateRecord::new(
        task.id(),
        updated_by,
        task.updated_at(),
    ));
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, updated_by: UserId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        append_record(&mut state, task, updated_by);
        Ok(())
    }

    async fn update_transition(
        &self,
        task: &Task,
        expected: TaskStatus,
        updated_by: UserId,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if stored.status() != expected {
            return Err(TaskRepositoryError::StatusConflict {
                task: task.id(),
                expected,
                actual: stored.status(),
            });
        }
        state.tasks.insert(task.id(), task.clone());
        append_record(&mut state, task, updated_by);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| matches(query, task))
            .cloned()
            .collect();
        match query.ordering {
            Some(ordering) => tasks.sort_by(|a, b| {
                let order = compare(ordering.key, a, b);
                match ordering.direction {
                    SortDirection::Ascending => order,
                    SortDirection::Descending => order.reverse(),
                }
            }),
            None => tasks.sort_by(|a, b| compare(TaskSortKey::CreatedAt, a, b)),
        }
        Ok(tasks)
    }

    async fn update_history(&self, id: TaskId) -> TaskRepositoryResult<Vec<TaskUpdateRecord>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.tasks.contains_key(&id) {
            return Err(TaskRepositoryError::NotFound(id));
        }
        Ok(state
            .update_log
            .iter()
            .filter(|record| record.task() == id)
            .cloned()
            .collect())
    }
}
