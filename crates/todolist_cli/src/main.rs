//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todolist_core` linkage and storage wiring end to end.
//! - Print a deterministic summary of a persisted project collection.
//!
//! Usage: `todolist_cli [db_path]` (in-memory storage when omitted).

use std::error::Error;
use std::process::ExitCode;
use todolist_core::db::{open_db, open_db_in_memory};
use todolist_core::{
    core_version, local_today, KvProjectRepository, SqliteKeyValueRepository, TaskStatus,
    TaskStore,
};

fn main() -> ExitCode {
    println!("todolist_core version={}", core_version());

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("todolist_cli failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: Option<String>) -> Result<(), Box<dyn Error>> {
    let conn = match db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let kv = SqliteKeyValueRepository::try_new(&conn)?;
    let store = TaskStore::open(KvProjectRepository::new(kv))?;
    let today = local_today();

    for project in store.projects() {
        println!(
            "project={} tasks={} pending={}",
            project.name,
            project.tasks.len(),
            project.pending_count()
        );
        for task in &project.tasks {
            let marker = match task.status {
                TaskStatus::Done => "x",
                TaskStatus::Pending if task.is_overdue_on(today) => "!",
                TaskStatus::Pending => " ",
            };
            println!(
                "  [{marker}] {} (due {}, {})",
                task.title,
                task.formatted_due_date(),
                task.priority.label()
            );
        }
    }

    Ok(())
}
