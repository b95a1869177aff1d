//! Domain model for projects and their tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by the task store.
//! - Keep wire naming (`dueDate`, lowercase enums) next to the types.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - A project exclusively owns its tasks.

pub mod project;
pub mod task;
