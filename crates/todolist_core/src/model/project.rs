//! Project domain model.
//!
//! # Responsibility
//! - Group tasks under a user-visible name.
//! - Provide in-place task list mutations used by the task store.
//!
//! # Invariants
//! - Task order is insertion order.
//! - Name uniqueness and Default protection are enforced by the store, not here.

use crate::model::task::{Task, TaskId, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reserved name of the always-present project.
pub const DEFAULT_PROJECT_NAME: &str = "Default";

/// Named, ordered collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Creates an empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Creates the reserved Default project.
    pub fn default_project() -> Self {
        Self::new(DEFAULT_PROJECT_NAME)
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_PROJECT_NAME
    }

    /// Appends a task and returns its id.
    pub fn add_task(&mut self, task: Task) -> TaskId {
        let id = task.id;
        self.tasks.push(task);
        id
    }

    /// Removes the task at `index`. Out-of-range indexes are a no-op.
    pub fn remove_task_at(&mut self, index: usize) -> Option<Task> {
        if index < self.tasks.len() {
            Some(self.tasks.remove(index))
        } else {
            None
        }
    }

    /// Removes the task with the given id.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Drops every `Done` task and returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.status != TaskStatus::Done);
        before - self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_done()).count()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len() - self.completed_count()
    }

    /// Tasks whose due date lies strictly before `today`.
    pub fn overdue_tasks(&self, today: NaiveDate) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |task| task.is_overdue_on(today))
    }
}
