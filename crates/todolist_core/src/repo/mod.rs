//! Repository layer: storage contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the task collection is mirrored to.
//! - Isolate JSON encoding and SQLite details from the task store.
//!
//! # Invariants
//! - Storage failures are returned as errors, never swallowed.
//! - Malformed persisted data is reported distinctly from storage failures.

pub mod kv_repo;
pub mod project_repo;
