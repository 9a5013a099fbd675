//! JSON-file task store and the status-aware mutation paths.
//!
//! The `Database` holds tasks and projects and is persisted as a single JSON
//! file with an atomic temp-file-and-rename save. Create and update go
//! through the mutation policy so both status axes are recomputed together,
//! and an update that resolves to done deletes the record instead of storing
//! a completed state.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::policy::{resolve_create, resolve_update, CreateTaskData, UpdateOutcome, UpdateTaskData};
use crate::project::Project;
use crate::task::Task;

/// In-memory store for tasks and projects, backed by one JSON file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Database {
    /// Load the database from a JSON file. A missing file yields an empty
    /// database; a corrupt one is a hard error rather than silent data loss.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Database::default());
        }
        let mut buf = String::new();
        File::open(path)?.read_to_string(&mut buf)?;
        let db = serde_json::from_str(&buf)?;
        Ok(db)
    }

    /// Save the database using an atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available task ID.
    pub fn next_task_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Create a task. The status triple is resolved by the mutation policy:
    /// whichever axis the caller supplied is master and the other is derived,
    /// with full defaulting when neither was given. A create that resolves to
    /// done is rejected: completed tasks are never stored, so a done record
    /// must not enter the store through the create path either.
    pub fn create_task(
        &mut self,
        data: CreateTaskData,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let triple = resolve_create(&data);
        if triple.is_done() {
            return Err(Error::InvalidValue {
                field: "status",
                value: "done (completed tasks are not stored)".to_string(),
            });
        }
        let task = Task {
            id: self.next_task_id(),
            title: data.title,
            description: data.description,
            status: triple.status,
            priority: Some(triple.priority_level),
            traditional_status: Some(triple.traditional_status),
            priority_level: Some(triple.priority_level),
            due: data.due,
            project_id: data.project_id,
            created_by: created_by.to_string(),
            assignees: data.assignees,
            tags: data.tags,
            created_at_utc: now.timestamp(),
            updated_at_utc: now.timestamp(),
        };
        debug!(id = task.id, status = task.status.label(), "created task");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Apply a partial update. When the resolved status is done (on either
    /// axis) the task is deleted and `Deleted` is returned; callers must
    /// branch on the outcome rather than assume an updated record exists.
    pub fn update_task(
        &mut self,
        id: u64,
        data: UpdateTaskData,
        now: DateTime<Utc>,
    ) -> UpdateOutcome {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return UpdateOutcome::NotFound;
        };

        let triple = resolve_update(&self.tasks[idx], &data);
        if let Some(triple) = triple {
            if triple.is_done() {
                let removed = self.tasks.remove(idx);
                info!(id = removed.id, "task completed, record deleted");
                return UpdateOutcome::Deleted;
            }
        }

        let task = &mut self.tasks[idx];
        if let Some(title) = data.title {
            task.title = title;
        }
        if let Some(description) = data.description {
            task.description = Some(description);
        }
        if data.clear_due {
            task.due = None;
        } else if let Some(due) = data.due {
            task.due = Some(due);
        }
        if data.clear_project {
            task.project_id = None;
        } else if let Some(project_id) = data.project_id {
            task.project_id = Some(project_id);
        }
        if let Some(assignees) = data.assignees {
            task.assignees = assignees;
        }
        for tag in &data.add_tags {
            if !task.tags.contains(tag) {
                task.tags.push(tag.clone());
            }
        }
        task.tags.retain(|t| !data.rm_tags.contains(t));
        if let Some(triple) = triple {
            task.status = triple.status;
            task.traditional_status = Some(triple.traditional_status);
            task.priority_level = Some(triple.priority_level);
            // Legacy field stays in sync for old readers.
            task.priority = Some(triple.priority_level);
        }
        task.updated_at_utc = now.timestamp();
        debug!(id, "updated task");
        UpdateOutcome::Updated(task.clone())
    }

    /// Delete a task explicitly.
    pub fn delete_task(&mut self, id: u64) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        let removed = self.tasks.remove(idx);
        info!(id, "deleted task");
        Ok(removed)
    }
}
