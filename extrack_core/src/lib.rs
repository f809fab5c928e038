#![forbid(unsafe_code)]

//! Core domain model and business logic for the extrack exercise tracker.
//!
//! This crate provides:
//! - Domain types (users, log entries, response views)
//! - Date normalization
//! - Log append and retrieval over a pluggable user store
//! - Persistence (JSON file store, in-memory store)
//! - CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod dates;
pub mod store;
pub mod query;
pub mod service;
pub mod directory;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Failure, FailureKind, Result};
pub use types::*;
pub use config::Config;
pub use query::LogQuery;
pub use service::{ExerciseLog, NewExercise};
pub use directory::UserDirectory;
pub use store::{JsonFileStore, MemoryStore, UserFilter, UserStore};
