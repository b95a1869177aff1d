//! Confirmation hooks for destructive task store operations.
//!
//! # Responsibility
//! - Describe destructive actions so a UI can prompt the user.
//! - Keep prompting outside the core: callers supply a `Confirm` callback.
//!
//! # Invariants
//! - The callback is asked only after the action has been validated; an
//!   impossible action returns its error without prompting.
//! - A declined prompt never mutates or saves.

use crate::model::project::Project;
use crate::model::task::{Task, TaskId};
use crate::repo::project_repo::ProjectRepository;
use crate::service::task_store::{TaskStore, TaskStoreResult};

/// Destructive action awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmRequest {
    DeleteProject { name: String },
    DeleteTask { project: String, title: String },
    ClearCompleted { project: String, count: usize },
}

impl ConfirmRequest {
    /// Prompt text for a yes/no dialog.
    pub fn message(&self) -> String {
        match self {
            Self::DeleteProject { name } => {
                format!("Are you sure you want to delete the project \"{name}\"?")
            }
            Self::DeleteTask { title, .. } => {
                format!("Are you sure you want to delete the todo \"{title}\"?")
            }
            Self::ClearCompleted { count, .. } => {
                format!("Are you sure you want to delete all {count} completed todos?")
            }
        }
    }
}

/// Yes/no decision supplied by the UI layer.
pub trait Confirm {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&ConfirmRequest) -> bool,
{
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        self(request)
    }
}

/// Outcome of a confirmed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmed<T> {
    Applied(T),
    Declined,
}

impl<T> Confirmed<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Declined => None,
        }
    }
}

impl<R: ProjectRepository> TaskStore<R> {
    /// `delete_project` behind a confirmation prompt.
    pub fn delete_project_confirmed(
        &mut self,
        name: &str,
        confirm: &mut impl Confirm,
    ) -> TaskStoreResult<Confirmed<Project>> {
        let index = match self.deletable_project_index(name) {
            Ok(index) => index,
            Err(err) => return self.reject("project_delete", err),
        };
        let approved = confirm.confirm(&ConfirmRequest::DeleteProject {
            name: self.projects()[index].name.clone(),
        });
        if !approved {
            return Ok(Confirmed::Declined);
        }
        self.delete_project(name).map(Confirmed::Applied)
    }

    /// `delete_task` behind a confirmation prompt.
    pub fn delete_task_confirmed(
        &mut self,
        project: &str,
        task_id: TaskId,
        confirm: &mut impl Confirm,
    ) -> TaskStoreResult<Confirmed<Task>> {
        let (project_index, task_index) = match self.task_position(project, task_id) {
            Ok(position) => position,
            Err(err) => return self.reject("task_delete", err),
        };
        let owner = &self.projects()[project_index];
        let approved = confirm.confirm(&ConfirmRequest::DeleteTask {
            project: owner.name.clone(),
            title: owner.tasks[task_index].title.clone(),
        });
        if !approved {
            return Ok(Confirmed::Declined);
        }
        self.delete_task(project, task_id).map(Confirmed::Applied)
    }

    /// `clear_completed` behind a confirmation prompt.
    ///
    /// Does not prompt when there is nothing to clear.
    pub fn clear_completed_confirmed(
        &mut self,
        project: &str,
        confirm: &mut impl Confirm,
    ) -> TaskStoreResult<Confirmed<usize>> {
        let index = match self.project_index(project) {
            Ok(index) => index,
            Err(err) => return self.reject("task_clear_completed", err),
        };
        let owner = &self.projects()[index];
        let count = owner.completed_count();
        if count == 0 {
            return Ok(Confirmed::Applied(0));
        }
        let approved = confirm.confirm(&ConfirmRequest::ClearCompleted {
            project: owner.name.clone(),
            count,
        });
        if !approved {
            return Ok(Confirmed::Declined);
        }
        self.clear_completed(project).map(Confirmed::Applied)
    }
}
