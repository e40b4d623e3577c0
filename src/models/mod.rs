// src/models/mod.rs

//! Domain models for the watcher application.

mod homework;

// Re-export all public types
pub use homework::{HomeworkRecord, ReviewStatus};
