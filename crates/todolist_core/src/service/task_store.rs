//! Task store use-case service.
//!
//! # Responsibility
//! - Own the in-memory project collection and expose CRUD over it.
//! - Persist the full collection after every successful mutation.
//!
//! # Invariants
//! - Project names are unique (exact match after trimming input).
//! - The Default project always exists and cannot be deleted.
//! - A mutation is all-or-nothing: validation failures change nothing, and a
//!   failed save restores the pre-mutation collection.
//! - Task order within a project is insertion order.

use crate::model::project::{Project, DEFAULT_PROJECT_NAME};
use crate::model::task::{NewTask, Task, TaskId, TaskStatus, TaskUpdate, TaskValidationError};
use crate::repo::project_repo::{LoadOutcome, ProjectRepository, RepoError};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Errors returned by task store operations.
#[derive(Debug)]
pub enum TaskStoreError {
    /// Project name is blank after trim.
    InvalidProjectName,
    /// A project with this name already exists.
    DuplicateProject(String),
    /// The reserved Default project cannot be deleted.
    ProtectedProject(String),
    /// No project with this name.
    ProjectNotFound(String),
    /// No task with this id in the project.
    TaskNotFound { project: String, task_id: TaskId },
    /// A task with this id already exists somewhere in the collection.
    DuplicateTaskId(TaskId),
    /// Task input failed validation.
    Validation(TaskValidationError),
    /// Persistence failed; in-memory state was rolled back.
    Repo(RepoError),
}

impl TaskStoreError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidProjectName => "invalid_project_name",
            Self::DuplicateProject(_) => "duplicate_project",
            Self::ProtectedProject(_) => "protected_project",
            Self::ProjectNotFound(_) => "project_not_found",
            Self::TaskNotFound { .. } => "task_not_found",
            Self::DuplicateTaskId(_) => "duplicate_task_id",
            Self::Validation(_) => "validation_failed",
            Self::Repo(_) => "persist_failed",
        }
    }

    /// Short message suitable for an alert-style notice.
    pub fn user_notice(&self) -> String {
        match self {
            Self::InvalidProjectName => "Project name cannot be empty!".to_string(),
            Self::DuplicateProject(_) => "Project already exists!".to_string(),
            Self::ProtectedProject(_) => "Cannot delete default project!".to_string(),
            Self::ProjectNotFound(name) => format!("Project \"{name}\" does not exist."),
            Self::TaskNotFound { .. } => "That to-do no longer exists.".to_string(),
            Self::DuplicateTaskId(_) => "That to-do has already been added.".to_string(),
            Self::Validation(TaskValidationError::DueDateInPast { .. }) => {
                "Due date must be today or in the future!".to_string()
            }
            Self::Validation(err) => format!("Invalid to-do: {err}."),
            Self::Repo(_) => "Your changes could not be saved.".to_string(),
        }
    }
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProjectName => write!(f, "project name must not be blank"),
            Self::DuplicateProject(name) => write!(f, "project already exists: {name}"),
            Self::ProtectedProject(name) => write!(f, "project is protected: {name}"),
            Self::ProjectNotFound(name) => write!(f, "project not found: {name}"),
            Self::TaskNotFound { project, task_id } => {
                write!(f, "task {task_id} not found in project {project}")
            }
            Self::DuplicateTaskId(task_id) => write!(f, "task id already exists: {task_id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for TaskStoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskStoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Explicitly constructed store over a persistence adapter.
pub struct TaskStore<R: ProjectRepository> {
    repo: R,
    projects: Vec<Project>,
}

impl<R: ProjectRepository> TaskStore<R> {
    /// Creates a store holding only the empty Default project.
    ///
    /// Does not read from storage; see `open`.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            projects: vec![Project::default_project()],
        }
    }

    /// Creates a store and loads any persisted collection.
    pub fn open(repo: R) -> TaskStoreResult<Self> {
        let mut store = Self::new(repo);
        store.load()?;
        Ok(store)
    }

    /// Replaces the collection with the persisted one.
    ///
    /// Returns `false` and keeps current state when storage is empty or the
    /// payload is malformed. The Default project is re-inserted at the front
    /// when the payload lacks it.
    pub fn load(&mut self) -> TaskStoreResult<bool> {
        match self.repo.load_projects()? {
            LoadOutcome::Loaded(mut projects) => {
                if !projects.iter().any(Project::is_default) {
                    projects.insert(0, Project::default_project());
                }
                info!(
                    "event=store_load module=task_store status=ok projects={} tasks={}",
                    projects.len(),
                    projects.iter().map(|p| p.tasks.len()).sum::<usize>()
                );
                self.projects = projects;
                Ok(true)
            }
            LoadOutcome::Absent => {
                info!("event=store_load module=task_store status=absent");
                Ok(false)
            }
            LoadOutcome::Malformed(_) => {
                warn!("event=store_load module=task_store status=fallback reason=malformed");
                Ok(false)
            }
        }
    }

    /// Writes the current collection to storage.
    pub fn save(&mut self) -> TaskStoreResult<()> {
        self.repo.save_projects(&self.projects)?;
        Ok(())
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        let name = name.trim();
        self.projects.iter().find(|project| project.name == name)
    }

    pub fn project_names(&self) -> Vec<&str> {
        self.projects
            .iter()
            .map(|project| project.name.as_str())
            .collect()
    }

    /// Tasks of one project in insertion order.
    pub fn tasks(&self, project: &str) -> TaskStoreResult<&[Task]> {
        let index = self.project_index(project)?;
        Ok(&self.projects[index].tasks)
    }

    pub fn task(&self, project: &str, task_id: TaskId) -> Option<&Task> {
        self.project(project)?.task(task_id)
    }

    /// All overdue tasks across projects, paired with their project name.
    pub fn overdue_tasks(&self, today: NaiveDate) -> Vec<(&str, &Task)> {
        self.projects
            .iter()
            .flat_map(|project| {
                project
                    .overdue_tasks(today)
                    .map(move |task| (project.name.as_str(), task))
            })
            .collect()
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn into_repo(self) -> R {
        self.repo
    }

    /// Appends a new empty project.
    pub fn add_project(&mut self, name: &str) -> TaskStoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return self.reject("project_add", TaskStoreError::InvalidProjectName);
        }
        if self.project(name).is_some() {
            return self.reject(
                "project_add",
                TaskStoreError::DuplicateProject(name.to_string()),
            );
        }

        let project = Project::new(name);
        self.mutate("project_add", move |projects| {
            projects.push(project);
            Ok(())
        })
    }

    /// Removes a project and all of its tasks.
    pub fn delete_project(&mut self, name: &str) -> TaskStoreResult<Project> {
        let index = match self.deletable_project_index(name) {
            Ok(index) => index,
            Err(err) => return self.reject("project_delete", err),
        };
        self.mutate("project_delete", |projects| Ok(projects.remove(index)))
    }

    /// Appends a task to the named project and returns its id.
    pub fn add_task_to_project(&mut self, project: &str, task: Task) -> TaskStoreResult<TaskId> {
        let index = match self.project_index(project) {
            Ok(index) => index,
            Err(err) => return self.reject("task_add", err),
        };
        if self.contains_task(task.id) {
            return self.reject("task_add", TaskStoreError::DuplicateTaskId(task.id));
        }

        self.mutate("task_add", |projects| Ok(projects[index].add_task(task)))
    }

    /// Builds a task from form input and appends it.
    ///
    /// Due dates before `today` are rejected.
    pub fn create_task(
        &mut self,
        project: &str,
        input: NewTask,
        today: NaiveDate,
    ) -> TaskStoreResult<TaskId> {
        match input.into_task(today) {
            Ok(task) => self.add_task_to_project(project, task),
            Err(err) => self.reject("task_add", err.into()),
        }
    }

    /// Removes the task at `index`.
    ///
    /// Out-of-range indexes are a no-op returning `Ok(None)` without saving.
    pub fn delete_task_at(&mut self, project: &str, index: usize) -> TaskStoreResult<Option<Task>> {
        let project_index = match self.project_index(project) {
            Ok(project_index) => project_index,
            Err(err) => return self.reject("task_delete", err),
        };
        if index >= self.projects[project_index].tasks.len() {
            debug!("event=task_delete module=task_store status=noop index={index}");
            return Ok(None);
        }

        self.mutate("task_delete", |projects| {
            Ok(projects[project_index].remove_task_at(index))
        })
    }

    /// Removes the task with the given id.
    pub fn delete_task(&mut self, project: &str, task_id: TaskId) -> TaskStoreResult<Task> {
        let (project_index, task_index) = match self.task_position(project, task_id) {
            Ok(position) => position,
            Err(err) => return self.reject("task_delete", err),
        };
        self.mutate("task_delete", |projects| {
            Ok(projects[project_index].tasks.remove(task_index))
        })
    }

    /// Flips a task between pending and done and returns the new status.
    pub fn toggle_task_status(
        &mut self,
        project: &str,
        task_id: TaskId,
    ) -> TaskStoreResult<TaskStatus> {
        let (project_index, task_index) = match self.task_position(project, task_id) {
            Ok(position) => position,
            Err(err) => return self.reject("task_toggle", err),
        };
        self.mutate("task_toggle", |projects| {
            Ok(projects[project_index].tasks[task_index].toggle_status())
        })
    }

    /// Applies a partial edit to one task.
    pub fn update_task(
        &mut self,
        project: &str,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> TaskStoreResult<()> {
        let (project_index, task_index) = match self.task_position(project, task_id) {
            Ok(position) => position,
            Err(err) => return self.reject("task_update", err),
        };
        self.mutate("task_update", |projects| {
            projects[project_index].tasks[task_index]
                .apply_update(update)
                .map_err(TaskStoreError::from)
        })
    }

    /// Removes all done tasks from a project and returns how many went.
    ///
    /// Nothing is saved when the project has no done tasks.
    pub fn clear_completed(&mut self, project: &str) -> TaskStoreResult<usize> {
        let index = match self.project_index(project) {
            Ok(index) => index,
            Err(err) => return self.reject("task_clear_completed", err),
        };
        if self.projects[index].completed_count() == 0 {
            return Ok(0);
        }

        self.mutate("task_clear_completed", |projects| {
            Ok(projects[index].clear_completed())
        })
    }

    pub(crate) fn project_index(&self, name: &str) -> TaskStoreResult<usize> {
        let trimmed = name.trim();
        self.projects
            .iter()
            .position(|project| project.name == trimmed)
            .ok_or_else(|| TaskStoreError::ProjectNotFound(trimmed.to_string()))
    }

    pub(crate) fn deletable_project_index(&self, name: &str) -> TaskStoreResult<usize> {
        if name.trim() == DEFAULT_PROJECT_NAME {
            return Err(TaskStoreError::ProtectedProject(
                DEFAULT_PROJECT_NAME.to_string(),
            ));
        }
        self.project_index(name)
    }

    pub(crate) fn task_position(
        &self,
        project: &str,
        task_id: TaskId,
    ) -> TaskStoreResult<(usize, usize)> {
        let project_index = self.project_index(project)?;
        let task_index = self.projects[project_index]
            .position(task_id)
            .ok_or_else(|| TaskStoreError::TaskNotFound {
                project: self.projects[project_index].name.clone(),
                task_id,
            })?;
        Ok((project_index, task_index))
    }

    fn contains_task(&self, task_id: TaskId) -> bool {
        self.projects
            .iter()
            .any(|project| project.task(task_id).is_some())
    }

    pub(crate) fn reject<T>(
        &self,
        event: &'static str,
        err: TaskStoreError,
    ) -> TaskStoreResult<T> {
        warn!(
            "event={event} module=task_store status=rejected error_code={}",
            err.code()
        );
        Err(err)
    }

    /// Applies `apply` to the collection and persists the result.
    ///
    /// Restores the snapshot when `apply` or the save fails.
    fn mutate<T>(
        &mut self,
        event: &'static str,
        apply: impl FnOnce(&mut Vec<Project>) -> TaskStoreResult<T>,
    ) -> TaskStoreResult<T> {
        let snapshot = self.projects.clone();

        let value = match apply(&mut self.projects) {
            Ok(value) => value,
            Err(err) => {
                self.projects = snapshot;
                return self.reject(event, err);
            }
        };

        if let Err(err) = self.repo.save_projects(&self.projects) {
            self.projects = snapshot;
            error!(
                "event={event} module=task_store status=error error_code=persist_failed error={err}"
            );
            return Err(err.into());
        }

        info!(
            "event={event} module=task_store status=ok projects={}",
            self.projects.len()
        );
        Ok(value)
    }
}
