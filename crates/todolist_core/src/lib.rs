//! Core domain logic for the to-do list manager.
//! This crate is the single source of truth for project/task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::project::{Project, DEFAULT_PROJECT_NAME};
pub use model::task::{
    format_due_date, local_today, parse_due_date, NewTask, Priority, Task, TaskId, TaskStatus,
    TaskUpdate, TaskValidationError,
};
pub use repo::kv_repo::{
    KeyValueRepository, KvError, KvResult, MemoryKeyValueRepository, SqliteKeyValueRepository,
};
pub use repo::project_repo::{
    KvProjectRepository, LoadOutcome, ProjectRepository, RepoError, RepoResult,
    PROJECTS_STORAGE_KEY,
};
pub use service::interaction::{Confirm, ConfirmRequest, Confirmed};
pub use service::task_store::{TaskStore, TaskStoreError, TaskStoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
