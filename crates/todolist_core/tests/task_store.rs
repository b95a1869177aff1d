use chrono::{Days, NaiveDate};
use todolist_core::{
    KeyValueRepository, KvError, KvProjectRepository, MemoryKeyValueRepository, NewTask, Priority,
    Task, TaskStatus, TaskStore, TaskStoreError, TaskUpdate, TaskValidationError,
    PROJECTS_STORAGE_KEY,
};

type MemoryStore = TaskStore<KvProjectRepository<MemoryKeyValueRepository>>;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn setup() -> MemoryStore {
    TaskStore::new(KvProjectRepository::new(MemoryKeyValueRepository::new()))
}

fn task(title: &str, priority: Priority) -> Task {
    Task::new(title, "", today() + Days::new(1), priority)
}

fn stored_payload(store: &MemoryStore) -> Option<String> {
    store.repo().kv().get_item(PROJECTS_STORAGE_KEY).unwrap()
}

#[test]
fn walkthrough_add_project_task_and_delete_by_index() {
    let mut store = setup();
    assert_eq!(store.project_names(), vec!["Default"]);

    store.add_project("Work").unwrap();
    let err = store.add_project("Work").unwrap_err();
    assert!(matches!(err, TaskStoreError::DuplicateProject(ref name) if name == "Work"));
    assert_eq!(store.project_names(), vec!["Default", "Work"]);

    let mut ship = task("Ship", Priority::High);
    ship.description = "release 1.0".to_string();
    store.add_task_to_project("Work", ship).unwrap();
    assert_eq!(store.tasks("Work").unwrap().len(), 1);

    let removed = store.delete_task_at("Work", 0).unwrap().unwrap();
    assert_eq!(removed.title, "Ship");
    assert!(store.tasks("Work").unwrap().is_empty());
}

#[test]
fn add_project_trims_and_rejects_blank_names() {
    let mut store = setup();

    store.add_project("  Home ").unwrap();
    assert!(store.project("Home").is_some());

    let err = store.add_project("   ").unwrap_err();
    assert!(matches!(err, TaskStoreError::InvalidProjectName));
    let err = store.add_project(" Home").unwrap_err();
    assert!(matches!(err, TaskStoreError::DuplicateProject(_)));
    assert_eq!(store.projects().len(), 2);
}

#[test]
fn duplicate_project_does_not_save() {
    let mut store = setup();
    store.add_project("Work").unwrap();
    let before = stored_payload(&store);

    store.add_project("Work").unwrap_err();
    assert_eq!(stored_payload(&store), before);
}

#[test]
fn default_project_cannot_be_deleted() {
    let mut store = setup();
    store
        .add_task_to_project("Default", task("keep me", Priority::Low))
        .unwrap();

    let err = store.delete_project("Default").unwrap_err();
    assert!(matches!(err, TaskStoreError::ProtectedProject(_)));
    assert_eq!(store.project_names(), vec!["Default"]);
    assert_eq!(store.tasks("Default").unwrap().len(), 1);
}

#[test]
fn delete_project_removes_it_and_reports_missing() {
    let mut store = setup();
    store.add_project("Work").unwrap();
    store
        .add_task_to_project("Work", task("a", Priority::Medium))
        .unwrap();

    let removed = store.delete_project("Work").unwrap();
    assert_eq!(removed.name, "Work");
    assert_eq!(removed.tasks.len(), 1);
    assert!(store.project("Work").is_none());

    let err = store.delete_project("Work").unwrap_err();
    assert!(matches!(err, TaskStoreError::ProjectNotFound(ref name) if name == "Work"));
}

#[test]
fn add_task_to_missing_project_mutates_nothing() {
    let mut store = setup();

    let err = store
        .add_task_to_project("Nope", task("lost", Priority::Low))
        .unwrap_err();
    assert!(matches!(err, TaskStoreError::ProjectNotFound(_)));
    assert!(store.tasks("Default").unwrap().is_empty());
    assert!(stored_payload(&store).is_none());
}

#[test]
fn add_task_rejects_reused_id() {
    let mut store = setup();
    store.add_project("Work").unwrap();
    let original = task("once", Priority::Low);
    let copy = original.clone();

    store.add_task_to_project("Default", original).unwrap();
    let err = store.add_task_to_project("Work", copy).unwrap_err();
    assert!(matches!(err, TaskStoreError::DuplicateTaskId(_)));
    assert!(store.tasks("Work").unwrap().is_empty());
}

#[test]
fn delete_task_at_out_of_range_is_noop() {
    let mut store = setup();
    store
        .add_task_to_project("Default", task("a", Priority::Low))
        .unwrap();
    let before = stored_payload(&store);

    assert!(store.delete_task_at("Default", 5).unwrap().is_none());
    assert_eq!(store.tasks("Default").unwrap().len(), 1);
    assert_eq!(stored_payload(&store), before);

    let err = store.delete_task_at("Missing", 0).unwrap_err();
    assert!(matches!(err, TaskStoreError::ProjectNotFound(_)));
}

#[test]
fn delete_task_by_id_is_stable_across_reordering() {
    let mut store = setup();
    let first = store
        .add_task_to_project("Default", task("first", Priority::Low))
        .unwrap();
    let second = store
        .add_task_to_project("Default", task("second", Priority::Low))
        .unwrap();

    store.delete_task("Default", first).unwrap();
    let removed = store.delete_task("Default", second).unwrap();
    assert_eq!(removed.title, "second");

    let err = store.delete_task("Default", second).unwrap_err();
    assert!(matches!(err, TaskStoreError::TaskNotFound { task_id, .. } if task_id == second));
}

#[test]
fn toggle_status_twice_restores_original() {
    let mut store = setup();
    let id = store
        .add_task_to_project("Default", task("flip", Priority::Medium))
        .unwrap();

    assert_eq!(
        store.toggle_task_status("Default", id).unwrap(),
        TaskStatus::Done
    );
    assert_eq!(
        store.toggle_task_status("Default", id).unwrap(),
        TaskStatus::Pending
    );
    assert_eq!(
        store.task("Default", id).unwrap().status,
        TaskStatus::Pending
    );
}

#[test]
fn update_task_replaces_given_fields_only() {
    let mut store = setup();
    let id = store
        .add_task_to_project("Default", task("draft", Priority::Low))
        .unwrap();
    let new_due = today() + Days::new(7);

    store
        .update_task(
            "Default",
            id,
            TaskUpdate {
                title: Some("final".to_string()),
                due_date: Some(new_due),
                ..TaskUpdate::default()
            },
        )
        .unwrap();

    let updated = store.task("Default", id).unwrap();
    assert_eq!(updated.title, "final");
    assert_eq!(updated.due_date, new_due);
    assert_eq!(updated.priority, Priority::Low);
    assert_eq!(updated.description, "");
}

#[test]
fn update_task_with_blank_title_changes_nothing() {
    let mut store = setup();
    let id = store
        .add_task_to_project("Default", task("keep", Priority::High))
        .unwrap();

    let err = store
        .update_task(
            "Default",
            id,
            TaskUpdate {
                title: Some("  ".to_string()),
                priority: Some(Priority::Low),
                ..TaskUpdate::default()
            },
        )
        .unwrap_err();

    assert!(matches!(
        err,
        TaskStoreError::Validation(TaskValidationError::EmptyTitle)
    ));
    let unchanged = store.task("Default", id).unwrap();
    assert_eq!(unchanged.title, "keep");
    assert_eq!(unchanged.priority, Priority::High);
}

#[test]
fn clear_completed_removes_done_tasks_only() {
    let mut store = setup();
    store
        .add_task_to_project("Default", task("open", Priority::Low))
        .unwrap();
    store
        .add_task_to_project(
            "Default",
            task("closed", Priority::Low).with_status(TaskStatus::Done),
        )
        .unwrap();

    assert_eq!(store.clear_completed("Default").unwrap(), 1);
    assert_eq!(store.clear_completed("Default").unwrap(), 0);
    let titles: Vec<_> = store
        .tasks("Default")
        .unwrap()
        .iter()
        .map(|t| t.title.clone())
        .collect();
    assert_eq!(titles, vec!["open"]);
}

#[test]
fn create_task_parses_form_input_and_rejects_past_dates() {
    let mut store = setup();

    let id = store
        .create_task(
            "Default",
            NewTask {
                title: " Ship ".to_string(),
                description: "notes".to_string(),
                due_date: "2026-10-19".to_string(),
                priority: "High".to_string(),
                status: String::new(),
            },
            today(),
        )
        .unwrap();
    let created = store.task("Default", id).unwrap();
    assert_eq!(created.title, "Ship");
    assert_eq!(created.priority, Priority::High);
    assert_eq!(created.status, TaskStatus::Pending);

    let err = store
        .create_task(
            "Default",
            NewTask {
                title: "late".to_string(),
                due_date: "2026-10-18".to_string(),
                priority: "low".to_string(),
                ..NewTask::default()
            },
            today(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        TaskStoreError::Validation(TaskValidationError::DueDateInPast { .. })
    ));
    assert_eq!(store.tasks("Default").unwrap().len(), 1);
}

#[test]
fn overdue_tasks_excludes_today() {
    let mut store = setup();
    store.add_project("Work").unwrap();
    let yesterday = Task::new("old", "", today() - Days::new(1), Priority::Low);
    let due_today = Task::new("now", "", today(), Priority::Low);
    store.add_task_to_project("Work", yesterday).unwrap();
    store.add_task_to_project("Default", due_today).unwrap();

    let overdue = store.overdue_tasks(today());
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].0, "Work");
    assert_eq!(overdue[0].1.title, "old");
}

#[test]
fn save_failure_rolls_back_and_surfaces_error() {
    let repo = KvProjectRepository::new(MemoryKeyValueRepository::with_quota(200));
    let mut store = TaskStore::new(repo);
    store.add_project("Work").unwrap();
    let saved = stored_payload(&store);

    let mut bulky = task("bulky", Priority::High);
    bulky.description = "x".repeat(500);
    let err = store.add_task_to_project("Work", bulky).unwrap_err();

    assert!(matches!(
        err,
        TaskStoreError::Repo(todolist_core::RepoError::Storage(
            KvError::QuotaExceeded { .. }
        ))
    ));
    assert!(store.tasks("Work").unwrap().is_empty());
    assert_eq!(stored_payload(&store), saved);
}

#[test]
fn update_task_trims_title_and_description() {
    let mut store = setup();
    let id = store
        .add_task_to_project("Default", task("draft", Priority::Low))
        .unwrap();

    store
        .update_task(
            "Default",
            id,
            TaskUpdate {
                title: Some("  final  ".to_string()),
                description: Some(" notes ".to_string()),
                ..TaskUpdate::default()
            },
        )
        .unwrap();

    let updated = store.task("Default", id).unwrap();
    assert_eq!(updated.title, "final");
    assert_eq!(updated.description, "notes");
}
