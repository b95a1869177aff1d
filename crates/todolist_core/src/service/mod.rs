//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory project collection and its invariants.
//! - Keep UI layers decoupled from storage and prompt details.

pub mod interaction;
pub mod task_store;
