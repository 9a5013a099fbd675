//! Error types shared across the crate.

use thiserror::Error;

/// Failures surfaced to callers. Invalid enum values never appear here: the
/// parse predicates degrade them to "not supplied" before persistence logic
/// runs. Store read/write failures pass through unmodified.
#[derive(Error, Debug)]
pub enum Error {
    #[error("task {0} not found")]
    TaskNotFound(u64),

    #[error("project {0} not found")]
    ProjectNotFound(u64),

    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
