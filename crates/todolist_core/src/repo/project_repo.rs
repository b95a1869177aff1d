//! Project collection persistence over key-value storage.
//!
//! # Responsibility
//! - Serialize the full project collection into one storage entry.
//! - Reconstruct and validate the collection on load.
//!
//! # Invariants
//! - Save always overwrites the whole entry; there are no partial writes.
//! - Load never returns a collection with blank or duplicate project names.
//! - Malformed payloads are reported as `LoadOutcome::Malformed`, not errors.

use crate::model::project::Project;
use crate::repo::kv_repo::{KeyValueRepository, KvError};
use log::{debug, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used when no custom key is configured.
pub const PROJECTS_STORAGE_KEY: &str = "projects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failures surfaced to the task store.
#[derive(Debug)]
pub enum RepoError {
    /// Storage backend rejected the read or write.
    Storage(KvError),
    /// Collection could not be encoded.
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode projects: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Result of reading the persisted collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A valid collection was found.
    Loaded(Vec<Project>),
    /// Nothing stored under the key.
    Absent,
    /// Stored payload could not be decoded; carries a diagnostic reason.
    Malformed(String),
}

/// Persistence adapter contract for the project collection.
pub trait ProjectRepository {
    fn load_projects(&self) -> RepoResult<LoadOutcome>;
    fn save_projects(&mut self, projects: &[Project]) -> RepoResult<()>;
}

/// `ProjectRepository` storing JSON under a single key.
#[derive(Debug)]
pub struct KvProjectRepository<K: KeyValueRepository> {
    kv: K,
    key: String,
}

impl<K: KeyValueRepository> KvProjectRepository<K> {
    /// Uses the default `projects` key.
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, PROJECTS_STORAGE_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn into_inner(self) -> K {
        self.kv
    }
}

impl<K: KeyValueRepository> ProjectRepository for KvProjectRepository<K> {
    fn load_projects(&self) -> RepoResult<LoadOutcome> {
        let Some(raw) = self.kv.get_item(&self.key)? else {
            debug!(
                "event=projects_load module=project_repo status=absent key={}",
                self.key
            );
            return Ok(LoadOutcome::Absent);
        };

        match decode_projects(&raw) {
            Ok(projects) => {
                debug!(
                    "event=projects_load module=project_repo status=ok key={} projects={}",
                    self.key,
                    projects.len()
                );
                Ok(LoadOutcome::Loaded(projects))
            }
            Err(reason) => {
                warn!(
                    "event=projects_load module=project_repo status=malformed key={} bytes={} reason={}",
                    self.key,
                    raw.len(),
                    reason
                );
                Ok(LoadOutcome::Malformed(reason))
            }
        }
    }

    fn save_projects(&mut self, projects: &[Project]) -> RepoResult<()> {
        let payload = encode_projects(projects)?;
        self.kv.set_item(&self.key, &payload)?;
        debug!(
            "event=projects_save module=project_repo status=ok key={} projects={} bytes={}",
            self.key,
            projects.len(),
            payload.len()
        );
        Ok(())
    }
}

/// Encodes the collection as a JSON array.
pub fn encode_projects(projects: &[Project]) -> RepoResult<String> {
    serde_json::to_string(projects).map_err(RepoError::Encode)
}

/// Decodes and validates a persisted JSON array of projects.
///
/// Project names are trimmed, matching how store lookups normalize input.
/// Returns a human-readable reason when the payload is unusable.
pub fn decode_projects(raw: &str) -> Result<Vec<Project>, String> {
    let mut projects: Vec<Project> =
        serde_json::from_str(raw).map_err(|err| format!("invalid payload: {err}"))?;
    for project in &mut projects {
        project.name = project.name.trim().to_string();
    }

    let mut names = HashSet::new();
    let mut task_ids = HashSet::new();
    for project in &projects {
        if project.name.is_empty() {
            return Err("project name must not be blank".to_string());
        }
        if !names.insert(project.name.as_str()) {
            return Err(format!("duplicate project name `{}`", project.name));
        }
        for task in &project.tasks {
            if !task_ids.insert(task.id) {
                return Err(format!("duplicate task id {}", task.id));
            }
        }
    }

    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::decode_projects;

    #[test]
    fn decode_rejects_non_array_payload() {
        let reason = decode_projects(r#"{"name":"Default"}"#).expect_err("object must fail");
        assert!(reason.contains("invalid payload"));
    }

    #[test]
    fn decode_rejects_duplicate_names() {
        let reason = decode_projects(
            r#"[{"name":"Work","tasks":[]},{"name":"Work","tasks":[]}]"#,
        )
        .expect_err("duplicates must fail");
        assert!(reason.contains("duplicate project name"));
    }

    #[test]
    fn decode_trims_names_before_duplicate_check() {
        let projects = decode_projects(r#"[{"name":" Work ","tasks":[]}]"#)
            .expect("padded name should decode");
        assert_eq!(projects[0].name, "Work");

        let reason = decode_projects(
            r#"[{"name":"Work","tasks":[]},{"name":"Work ","tasks":[]}]"#,
        )
        .expect_err("padded duplicate must fail");
        assert!(reason.contains("duplicate project name"));
    }

    #[test]
    fn decode_rejects_blank_names() {
        let reason =
            decode_projects(r#"[{"name":"  ","tasks":[]}]"#).expect_err("blank must fail");
        assert!(reason.contains("blank"));
    }

    #[test]
    fn decode_accepts_tasks_without_ids() {
        let projects = decode_projects(
            r#"[{"name":"Default","tasks":[
                {"title":"a","description":"","dueDate":"2026-10-20","priority":"low","status":"pending"},
                {"title":"b","description":"","dueDate":"2026-10-21","priority":"high","status":"done"}
            ]}]"#,
        )
        .expect("legacy payload should decode");
        assert_eq!(projects[0].tasks.len(), 2);
        assert_ne!(projects[0].tasks[0].id, projects[0].tasks[1].id);
    }
}
