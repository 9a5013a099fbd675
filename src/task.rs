//! Task data structures and the view adapter between status systems.
//!
//! A stored `Task` carries both status axes side by side: the custom status is
//! the master representation, with the traditional status and priority level
//! persisted alongside it. `TraditionalTask` is the shape consumers of the
//! traditional system see, and `TaskView` is the tagged union the query layer
//! operates over so that mixed-shape lists need no up-front normalisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::convert::{custom_to_traditional, traditional_to_custom};
use crate::status::{CustomStatus, PriorityLevel, StatusMode, TraditionalStatus};

/// A work item with both status representations persisted side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    /// Master status representation.
    pub status: CustomStatus,
    /// Deprecated legacy priority, retained for backward-compatible reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityLevel>,
    /// Synced traditional axis. Absent only on rows predating the migration.
    #[serde(default)]
    pub traditional_status: Option<TraditionalStatus>,
    #[serde(default)]
    pub priority_level: Option<PriorityLevel>,
    pub due: Option<DateTime<Utc>>,
    pub project_id: Option<u64>,
    pub created_by: String,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// The same work item in the traditional two-axis shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraditionalTask {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: TraditionalStatus,
    pub priority: PriorityLevel,
    pub due: Option<DateTime<Utc>>,
    pub project_id: Option<u64>,
    pub created_by: String,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// A task in either representation, discriminated explicitly so every branch
/// is checked at compile time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum TaskView {
    Custom(Task),
    Traditional(TraditionalTask),
}

impl Task {
    /// Convert to the traditional shape, preferring the persisted traditional
    /// axis and falling back to converting the master status.
    pub fn to_traditional(&self) -> TraditionalTask {
        let (converted_status, converted_priority) = custom_to_traditional(self.status);
        TraditionalTask {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.traditional_status.unwrap_or(converted_status),
            priority: self.priority_level.unwrap_or(converted_priority),
            due: self.due,
            project_id: self.project_id,
            created_by: self.created_by.clone(),
            assignees: self.assignees.clone(),
            tags: self.tags.clone(),
            created_at_utc: self.created_at_utc,
            updated_at_utc: self.updated_at_utc,
        }
    }
}

impl TraditionalTask {
    /// Convert to the custom shape, deriving the master status from this
    /// task's own status and priority.
    pub fn to_task(&self) -> Task {
        Task {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: traditional_to_custom(self.status, self.priority),
            priority: Some(self.priority),
            traditional_status: Some(self.status),
            priority_level: Some(self.priority),
            due: self.due,
            project_id: self.project_id,
            created_by: self.created_by.clone(),
            assignees: self.assignees.clone(),
            tags: self.tags.clone(),
            created_at_utc: self.created_at_utc,
            updated_at_utc: self.updated_at_utc,
        }
    }
}

impl TaskView {
    /// The custom-axis status, converting on the fly for traditional tasks.
    pub fn custom_status(&self) -> CustomStatus {
        match self {
            TaskView::Custom(t) => t.status,
            TaskView::Traditional(t) => traditional_to_custom(t.status, t.priority),
        }
    }

    /// The traditional-axis status, preferring the persisted value and
    /// converting from the master status where it is absent.
    pub fn traditional_status(&self) -> TraditionalStatus {
        match self {
            TaskView::Custom(t) => t
                .traditional_status
                .unwrap_or_else(|| custom_to_traditional(t.status).0),
            TaskView::Traditional(t) => t.status,
        }
    }

    /// The effective priority level, converting from the master status where
    /// no explicit level is stored.
    pub fn priority(&self) -> PriorityLevel {
        match self {
            TaskView::Custom(t) => t
                .priority_level
                .unwrap_or_else(|| custom_to_traditional(t.status).1),
            TaskView::Traditional(t) => t.priority,
        }
    }

    pub fn due(&self) -> Option<DateTime<Utc>> {
        match self {
            TaskView::Custom(t) => t.due,
            TaskView::Traditional(t) => t.due,
        }
    }

    /// True iff a due date exists, lies strictly before `now`, and the task is
    /// not done on whichever axis this view carries.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        let Some(due) = self.due() else {
            return false;
        };
        let done = match self {
            TaskView::Custom(t) => t.status == CustomStatus::Done,
            TaskView::Traditional(t) => t.status == TraditionalStatus::Done,
        };
        !done && due < now
    }

    /// Urgency score for relative ordering only: priority x 10, plus 50 when
    /// overdue, plus 20 when due on the same calendar day as `now`.
    pub fn urgency(&self, now: DateTime<Utc>) -> u32 {
        let mut score = self.priority().value() as u32 * 10;
        if self.is_overdue(now) {
            score += 50;
        }
        if let Some(due) = self.due() {
            if due.date_naive() == now.date_naive() {
                score += 20;
            }
        }
        score
    }

    /// Re-shape this view into the requested mode. Already-matching shapes
    /// pass through unchanged.
    pub fn into_mode(self, mode: StatusMode) -> TaskView {
        match (mode, self) {
            (StatusMode::Traditional, TaskView::Custom(t)) => {
                TaskView::Traditional(t.to_traditional())
            }
            (StatusMode::Custom, TaskView::Traditional(t)) => TaskView::Custom(t.to_task()),
            (_, v) => v,
        }
    }
}
