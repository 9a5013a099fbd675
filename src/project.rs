//! Project aggregate and its store operations.
//!
//! Projects are lightweight grouping records referenced by tasks via
//! `project_id`. Deleting a project clears those references rather than
//! cascading into the tasks themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};

/// A project grouping tasks, with a display colour for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_by: String,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// Colour assigned to projects created without one.
pub const DEFAULT_PROJECT_COLOR: &str = "blue";

impl Database {
    /// Generate the next available project ID.
    pub fn next_project_id(&self) -> u64 {
        self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Get a project by ID.
    pub fn get_project(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Find a project by exact name (case-insensitive).
    pub fn find_project(&self, name: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Create a project. Names must be non-empty and unique.
    pub fn create_project(
        &mut self,
        name: &str,
        description: Option<String>,
        color: Option<String>,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidValue {
                field: "project name",
                value: name.to_string(),
            });
        }
        if self.find_project(name).is_some() {
            return Err(Error::InvalidValue {
                field: "project name",
                value: format!("{name} already exists"),
            });
        }
        let project = Project {
            id: self.next_project_id(),
            name: name.to_string(),
            description,
            color: color.unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string()),
            created_by: created_by.to_string(),
            created_at_utc: now.timestamp(),
            updated_at_utc: now.timestamp(),
        };
        info!(id = project.id, name = %project.name, "created project");
        self.projects.push(project.clone());
        Ok(project)
    }

    /// Rename a project or change its colour/description.
    pub fn update_project(
        &mut self,
        id: u64,
        name: Option<String>,
        description: Option<String>,
        color: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Project> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::ProjectNotFound(id))?;
        if let Some(ref new_name) = name {
            if new_name.trim().is_empty() {
                return Err(Error::InvalidValue {
                    field: "project name",
                    value: new_name.clone(),
                });
            }
        }
        let project = &mut self.projects[idx];
        if let Some(name) = name {
            project.name = name.trim().to_string();
        }
        if let Some(description) = description {
            project.description = Some(description);
        }
        if let Some(color) = color {
            project.color = color;
        }
        project.updated_at_utc = now.timestamp();
        Ok(project.clone())
    }

    /// Delete a project and clear any task references to it.
    pub fn delete_project(&mut self, id: u64) -> Result<Project> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::ProjectNotFound(id))?;
        let removed = self.projects.remove(idx);
        for task in self.tasks.iter_mut() {
            if task.project_id == Some(id) {
                task.project_id = None;
            }
        }
        info!(id, name = %removed.name, "deleted project");
        Ok(removed)
    }
}
