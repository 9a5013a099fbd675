//! Status-aware mutation policy.
//!
//! When a caller creates or updates a task it may specify either status axis,
//! both, or neither. This module resolves the supplied fields into one fully
//! consistent (custom, traditional, priority) triple before anything is
//! persisted, and decides when a mutation resolves to done so the store can
//! delete the record instead of keeping a completed state.

use chrono::{DateTime, Utc};

use crate::convert::{
    custom_to_traditional, traditional_to_custom, DEFAULT_CUSTOM_STATUS, DEFAULT_PRIORITY,
};
use crate::status::{CustomStatus, PriorityLevel, TraditionalStatus};
use crate::task::Task;

/// Caller-supplied fields for creating a task. Either status axis may be
/// given; invalid values must be degraded to `None` at the boundary.
#[derive(Debug, Clone, Default)]
pub struct CreateTaskData {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<CustomStatus>,
    pub traditional_status: Option<TraditionalStatus>,
    /// Legacy priority field, still accepted from old callers.
    pub priority: Option<PriorityLevel>,
    pub priority_level: Option<PriorityLevel>,
    pub due: Option<DateTime<Utc>>,
    pub project_id: Option<u64>,
    pub assignees: Vec<String>,
    pub tags: Vec<String>,
}

/// Caller-supplied fields for a partial update.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<CustomStatus>,
    pub traditional_status: Option<TraditionalStatus>,
    /// Legacy priority field, still accepted from old callers.
    pub priority: Option<PriorityLevel>,
    pub priority_level: Option<PriorityLevel>,
    pub due: Option<DateTime<Utc>>,
    pub clear_due: bool,
    pub project_id: Option<u64>,
    pub clear_project: bool,
    pub assignees: Option<Vec<String>>,
    pub add_tags: Vec<String>,
    pub rm_tags: Vec<String>,
}

/// A fully consistent pair of status representations, ready to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTriple {
    pub status: CustomStatus,
    pub traditional_status: TraditionalStatus,
    pub priority_level: PriorityLevel,
}

impl StatusTriple {
    /// Derive the full triple from a master custom status.
    pub fn from_custom(status: CustomStatus) -> Self {
        let (traditional_status, priority_level) = custom_to_traditional(status);
        StatusTriple {
            status,
            traditional_status,
            priority_level,
        }
    }

    /// Derive the full triple from a traditional (status, priority) pair.
    /// The supplied pair is kept verbatim; only the custom bucket is derived.
    pub fn from_traditional(status: TraditionalStatus, priority: PriorityLevel) -> Self {
        StatusTriple {
            status: traditional_to_custom(status, priority),
            traditional_status: status,
            priority_level: priority,
        }
    }

    /// True when this mutation resolves to the terminal done state, on either
    /// axis. Done tasks are deleted, never stored.
    pub fn is_done(&self) -> bool {
        self.status == CustomStatus::Done || self.traditional_status == TraditionalStatus::Done
    }
}

/// Outcome of a status-aware update. Deletion is a distinct variant so
/// callers cannot mistake it for an ordinary update.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Updated(Task),
    Deleted,
    NotFound,
}

/// Resolve the status triple for a new task. Exactly one branch fires: a
/// supplied custom status is master; otherwise a supplied traditional status
/// is master with the priority defaulted; otherwise everything defaults.
pub fn resolve_create(data: &CreateTaskData) -> StatusTriple {
    if let Some(custom) = data.status {
        return StatusTriple::from_custom(custom);
    }
    if let Some(traditional) = data.traditional_status {
        let priority = data
            .priority_level
            .or(data.priority)
            .unwrap_or(DEFAULT_PRIORITY);
        return StatusTriple::from_traditional(traditional, priority);
    }
    StatusTriple::from_custom(DEFAULT_CUSTOM_STATUS)
}

/// Resolve the status triple for an update, or `None` when no status axis was
/// touched. Precedence: custom status, then traditional status, then a bare
/// priority level, then the bare legacy priority.
pub fn resolve_update(current: &Task, data: &UpdateTaskData) -> Option<StatusTriple> {
    if let Some(custom) = data.status {
        return Some(StatusTriple::from_custom(custom));
    }
    if let Some(traditional) = data.traditional_status {
        let priority = data
            .priority_level
            .or(data.priority)
            .or(current.priority_level)
            .or(current.priority)
            .unwrap_or(DEFAULT_PRIORITY);
        return Some(StatusTriple::from_traditional(traditional, priority));
    }
    if let Some(priority) = data.priority_level.or(data.priority) {
        // Priority alone: keep the task's current lifecycle stage.
        let traditional = current
            .traditional_status
            .unwrap_or_else(|| custom_to_traditional(current.status).0);
        return Some(StatusTriple::from_traditional(traditional, priority));
    }
    None
}
