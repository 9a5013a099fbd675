//! Command implementations for the CLI interface.
//!
//! This is the action boundary: each handler translates caller-supplied
//! arguments into the mutation policy's input shape, applies it against the
//! store, and surfaces the outcome. Update-style commands branch explicitly
//! on the deleted outcome so a completed task is reported as removed, not
//! re-rendered.

use std::path::Path;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::policy::{CreateTaskData, UpdateOutcome, UpdateTaskData};
use crate::query::{
    apply_filters, filter_by_status, sort_by_urgency, sort_tasks, status_counts, DueWindow,
    SortDirection, SortKey, StatusCounts, StatusQuery, TaskFilters, TaskSort,
};
use crate::status::{
    parse_custom_status, parse_traditional_status, CustomStatus, PriorityLevel, StatusMode,
    TraditionalStatus,
};
use crate::task::TaskView;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Custom status: urgent | priority-2 | priority-3 | done.
        #[arg(long, value_enum)]
        status: Option<CustomStatus>,
        /// Traditional status: todo | in-progress | done.
        #[arg(long, value_enum)]
        traditional_status: Option<TraditionalStatus>,
        /// Priority level: low | medium | high | urgent (or 1-4).
        #[arg(long, value_enum)]
        priority_level: Option<PriorityLevel>,
        /// Legacy priority field, accepted for old scripts.
        #[arg(long, value_enum, hide = true)]
        priority: Option<PriorityLevel>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Project name.
        #[arg(long)]
        project: Option<String>,
        /// Assignee. May be repeated.
        #[arg(long = "assignee")]
        assignees: Vec<String>,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Status system to filter and display in.
        #[arg(long, value_enum, default_value_t = StatusMode::Custom)]
        mode: StatusMode,
        /// Status value in the selected mode's vocabulary.
        #[arg(long)]
        status: Option<String>,
        /// Filter by priority level.
        #[arg(long, value_enum)]
        priority: Option<PriorityLevel>,
        /// Filter by project name.
        #[arg(long)]
        project: Option<String>,
        /// Filter by assignee.
        #[arg(long)]
        assignee: Option<String>,
        /// Filter by tag.
        #[arg(long)]
        tag: Option<String>,
        /// Due filter: overdue | today | this-week | this-month.
        #[arg(long, value_enum)]
        due: Option<DueWindow>,
        /// Substring search over title and description.
        #[arg(long)]
        search: Option<String>,
        /// Sort key: urgency, or a stored field (due, created, updated,
        /// priority, title).
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
        /// Sort direction; only meaningful together with --sort.
        #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
        direction: SortDirection,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by ID.
    View {
        id: u64,
        /// Show the traditional representation instead of the custom one.
        #[arg(long)]
        traditional: bool,
    },

    /// Update fields on a task. Resolving to done deletes the task.
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Custom status (master when supplied).
        #[arg(long, value_enum)]
        status: Option<CustomStatus>,
        /// Traditional status (master when no custom status is supplied).
        #[arg(long, value_enum)]
        traditional_status: Option<TraditionalStatus>,
        #[arg(long, value_enum)]
        priority_level: Option<PriorityLevel>,
        /// Legacy priority field, accepted for old scripts.
        #[arg(long, value_enum, hide = true)]
        priority: Option<PriorityLevel>,
        #[arg(long)]
        due: Option<String>,
        /// Clear due date.
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        project: Option<String>,
        /// Clear project reference.
        #[arg(long)]
        clear_project: bool,
        /// Replace assignees. May be repeated.
        #[arg(long = "assignee")]
        assignees: Vec<String>,
        /// Add tags. May be repeated and comma-separated.
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        /// Remove tags. May be repeated and comma-separated.
        #[arg(long = "rm-tag")]
        rm_tags: Vec<String>,
    },

    /// Mark a task done. The record is deleted, not archived.
    Complete { id: u64 },

    /// Delete a task by ID.
    Delete { id: u64 },

    /// Show status counts for the dashboard summary.
    Counts {
        #[arg(long, value_enum, default_value_t = StatusMode::Custom)]
        mode: StatusMode,
    },

    /// Manage projects.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project.
    Add {
        name: String,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// List projects with task counts.
    List,
    /// Update a project's name, description, or colour.
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a project. Tasks keep living but lose the reference.
    Delete { id: u64 },
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &mut Database,
    db_path: &Path,
    user: &str,
    title: String,
    desc: Option<String>,
    status: Option<CustomStatus>,
    traditional_status: Option<TraditionalStatus>,
    priority_level: Option<PriorityLevel>,
    priority: Option<PriorityLevel>,
    due: Option<String>,
    project: Option<String>,
    assignees: Vec<String>,
    tags: Vec<String>,
) -> Result<()> {
    let project_id = resolve_project(db, project.as_deref())?;
    let due = parse_due(due.as_deref())?;
    let task = db.create_task(
        CreateTaskData {
            title,
            description: desc,
            status,
            traditional_status,
            priority,
            priority_level,
            due,
            project_id,
            assignees,
            tags: split_and_normalise_tags(&tags),
        },
        user,
        Utc::now(),
    )?;
    db.save(db_path)?;
    println!("Added task {} ({})", task.id, task.status.label());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_list(
    db: &Database,
    mode: StatusMode,
    status: Option<String>,
    priority: Option<PriorityLevel>,
    project: Option<String>,
    assignee: Option<String>,
    tag: Option<String>,
    due: Option<DueWindow>,
    search: Option<String>,
    sort: Option<SortKey>,
    direction: SortDirection,
    limit: Option<usize>,
) -> Result<()> {
    let now = Utc::now();
    let project_id = resolve_project(db, project.as_deref())?;
    let filters = TaskFilters {
        priority,
        project: project_id,
        assignee,
        tag,
        due,
        search,
    };
    let mut tasks = apply_filters(&db.tasks, &filters, now);
    // Field sorts run on the stored tasks; the urgency sort runs on views
    // below, after the status filter.
    if let Some(field) = sort.and_then(SortKey::as_field) {
        tasks = sort_tasks(&tasks, &TaskSort { field, direction });
    }
    let mut views: Vec<TaskView> = tasks.into_iter().map(TaskView::Custom).collect();

    // The status filter speaks the selected mode's vocabulary and converts
    // each task's relevant axis on the fly.
    if let Some(ref wanted) = status {
        let query = parse_status_query(wanted, mode)?;
        views = filter_by_status(&views, query);
    }
    if sort == Some(SortKey::Urgency) {
        views = sort_by_urgency(&views, direction, now);
    }
    if let Some(limit) = limit {
        views.truncate(limit);
    }

    print_table(db, &views, mode, now);
    Ok(())
}

pub fn cmd_view(db: &Database, id: u64, traditional: bool) -> Result<()> {
    let task = db.get_task(id).ok_or(Error::TaskNotFound(id))?;
    if traditional {
        let t = task.to_traditional();
        println!("#{} {}", t.id, t.title);
        println!("  status:   {} [{}]", t.status.label(), t.status.color());
        println!(
            "  priority: {} ({}) [{}]",
            t.priority.label(),
            t.priority.value(),
            t.priority.color()
        );
        print_common(db, &TaskView::Traditional(t));
    } else {
        println!("#{} {}", task.id, task.title);
        println!("  status:   {} [{}]", task.status.label(), task.status.color());
        print_common(db, &TaskView::Custom(task.clone()));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    db: &mut Database,
    db_path: &Path,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    status: Option<CustomStatus>,
    traditional_status: Option<TraditionalStatus>,
    priority_level: Option<PriorityLevel>,
    priority: Option<PriorityLevel>,
    due: Option<String>,
    clear_due: bool,
    project: Option<String>,
    clear_project: bool,
    assignees: Vec<String>,
    add_tags: Vec<String>,
    rm_tags: Vec<String>,
) -> Result<()> {
    let project_id = resolve_project(db, project.as_deref())?;
    let data = UpdateTaskData {
        title,
        description: desc,
        status,
        traditional_status,
        priority,
        priority_level,
        due: parse_due(due.as_deref())?,
        clear_due,
        project_id,
        clear_project,
        assignees: if assignees.is_empty() {
            None
        } else {
            Some(assignees)
        },
        add_tags: split_and_normalise_tags(&add_tags),
        rm_tags: split_and_normalise_tags(&rm_tags),
    };
    let outcome = db.update_task(id, data, Utc::now());
    report_outcome(db, db_path, id, outcome)
}

pub fn cmd_complete(db: &mut Database, db_path: &Path, id: u64) -> Result<()> {
    let data = UpdateTaskData {
        status: Some(CustomStatus::Done),
        ..Default::default()
    };
    let outcome = db.update_task(id, data, Utc::now());
    report_outcome(db, db_path, id, outcome)
}

pub fn cmd_delete(db: &mut Database, db_path: &Path, id: u64) -> Result<()> {
    let removed = db.delete_task(id)?;
    db.save(db_path)?;
    println!("Deleted task {} ({})", removed.id, removed.title);
    Ok(())
}

pub fn cmd_counts(db: &Database, mode: StatusMode) {
    let now = Utc::now();
    let views: Vec<TaskView> = db.tasks.iter().cloned().map(TaskView::Custom).collect();
    match status_counts(&views, mode, now) {
        StatusCounts::Custom {
            urgent,
            priority_2,
            priority_3,
            done,
            overdue,
            total,
        } => {
            println!("{:<12} {}", "Urgent", urgent);
            println!("{:<12} {}", "Priority 2", priority_2);
            println!("{:<12} {}", "Priority 3", priority_3);
            println!("{:<12} {}", "Done", done);
            println!("{:<12} {}", "Overdue", overdue);
            println!("{:<12} {}", "Total", total);
        }
        StatusCounts::Traditional {
            todo,
            in_progress,
            done,
            priority,
            overdue,
            total,
        } => {
            println!("{:<12} {}", "To Do", todo);
            println!("{:<12} {}", "In Progress", in_progress);
            println!("{:<12} {}", "Done", done);
            for (i, count) in priority.iter().enumerate() {
                println!("{:<12} {}", format!("Priority {}", i + 1), count);
            }
            println!("{:<12} {}", "Overdue", overdue);
            println!("{:<12} {}", "Total", total);
        }
    }
}

pub fn cmd_project(
    db: &mut Database,
    db_path: &Path,
    user: &str,
    action: ProjectAction,
) -> Result<()> {
    match action {
        ProjectAction::Add { name, desc, color } => {
            let project = db.create_project(&name, desc, color, user, Utc::now())?;
            db.save(db_path)?;
            println!("Added project {} ({})", project.id, project.name);
        }
        ProjectAction::List => {
            println!("{:<5} {:<20} {:<8} {}", "ID", "Name", "Colour", "Tasks");
            for project in &db.projects {
                let count = db
                    .tasks
                    .iter()
                    .filter(|t| t.project_id == Some(project.id))
                    .count();
                println!(
                    "{:<5} {:<20} {:<8} {}",
                    project.id,
                    truncate(&project.name, 20),
                    project.color,
                    count
                );
            }
        }
        ProjectAction::Update {
            id,
            name,
            desc,
            color,
        } => {
            let project = db.update_project(id, name, desc, color, Utc::now())?;
            db.save(db_path)?;
            println!("Updated project {} ({})", project.id, project.name);
        }
        ProjectAction::Delete { id } => {
            let removed = db.delete_project(id)?;
            db.save(db_path)?;
            println!("Deleted project {} ({})", removed.id, removed.name);
        }
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Persist and report an update outcome. Deletion is a distinct message so
/// callers (and scripts) can tell a removed row from a re-rendered one.
fn report_outcome(
    db: &Database,
    db_path: &Path,
    id: u64,
    outcome: UpdateOutcome,
) -> Result<()> {
    match outcome {
        UpdateOutcome::Updated(task) => {
            db.save(db_path)?;
            println!("Updated task {} ({})", task.id, task.status.label());
            Ok(())
        }
        UpdateOutcome::Deleted => {
            db.save(db_path)?;
            println!("Task {id} completed and removed");
            Ok(())
        }
        UpdateOutcome::NotFound => Err(Error::TaskNotFound(id)),
    }
}

/// Resolve a status string against the selected mode's vocabulary.
fn parse_status_query(s: &str, mode: StatusMode) -> Result<StatusQuery> {
    let query = match mode {
        StatusMode::Custom => parse_custom_status(s).map(StatusQuery::Custom),
        StatusMode::Traditional => parse_traditional_status(s).map(StatusQuery::Traditional),
    };
    query.ok_or_else(|| Error::InvalidValue {
        field: "status",
        value: s.to_string(),
    })
}

/// Look up a project by name, erroring when it does not exist.
fn resolve_project(db: &Database, name: Option<&str>) -> Result<Option<u64>> {
    match name {
        None => Ok(None),
        Some(name) => db
            .find_project(name)
            .map(|p| Some(p.id))
            .ok_or_else(|| Error::InvalidValue {
                field: "project",
                value: name.to_string(),
            }),
    }
}

/// Parse human-readable due date input.
///
/// Supports "today", "tomorrow", "in Nd", "in Nw", and YYYY-MM-DD. Dates are
/// anchored at local end-of-day so a task due "today" is not instantly
/// overdue.
pub fn parse_due(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(s) = s else {
        return Ok(None);
    };
    let lowered = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    let date = match lowered.as_str() {
        "today" => Some(today),
        "tomorrow" => Some(today + Duration::days(1)),
        _ => {
            if let Some(rest) = lowered.strip_prefix("in ") {
                if let Some(nd) = rest.strip_suffix('d') {
                    nd.trim().parse::<i64>().ok().map(|n| today + Duration::days(n))
                } else if let Some(nw) = rest.strip_suffix('w') {
                    nw.trim()
                        .parse::<i64>()
                        .ok()
                        .map(|n| today + Duration::weeks(n))
                } else {
                    None
                }
            } else {
                NaiveDate::parse_from_str(&lowered, "%Y-%m-%d").ok()
            }
        }
    };

    let date = date.ok_or_else(|| Error::InvalidValue {
        field: "due",
        value: s.to_string(),
    })?;
    let local = Local
        .from_local_datetime(&date.and_hms_opt(23, 59, 59).expect("valid time"))
        .earliest()
        .ok_or_else(|| Error::InvalidValue {
            field: "due",
            value: s.to_string(),
        })?;
    Ok(Some(local.with_timezone(&Utc)))
}

/// Split comma-separated tag strings, trimming, lowercasing, and hyphenating.
pub fn split_and_normalise_tags(inputs: &[String]) -> Vec<String> {
    let mut tags = Vec::new();
    for raw in inputs {
        for part in raw.split(',') {
            let tag = part.trim().to_lowercase().replace(' ', "-");
            if !tag.is_empty() {
                tags.push(tag);
            }
        }
    }
    tags.sort();
    tags.dedup();
    tags
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<DateTime<Utc>>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d.with_timezone(&Local).date_naive() - today).num_days();
            if days == 0 {
                "today".into()
            } else if days == 1 {
                "tomorrow".into()
            } else if days > 1 {
                format!("in {days}d")
            } else {
                format!("{}d late", -days)
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

fn print_common(db: &Database, view: &TaskView) {
    let now = Utc::now();
    let (description, due, project_id, assignees, tags) = match view {
        TaskView::Custom(t) => (&t.description, t.due, t.project_id, &t.assignees, &t.tags),
        TaskView::Traditional(t) => (&t.description, t.due, t.project_id, &t.assignees, &t.tags),
    };
    if let Some(desc) = description {
        println!("  desc:     {desc}");
    }
    println!(
        "  due:      {}",
        format_due_relative(due, Local::now().date_naive())
    );
    if let Some(pid) = project_id {
        let name = db.get_project(pid).map(|p| p.name.as_str()).unwrap_or("?");
        println!("  project:  {name}");
    }
    if !assignees.is_empty() {
        println!("  assignees: {}", assignees.join(", "));
    }
    if !tags.is_empty() {
        println!("  tags:     [{}]", tags.join(","));
    }
    if view.is_overdue(now) {
        println!("  overdue:  yes (urgency {})", view.urgency(now));
    }
}

/// Print tasks in a formatted table, showing the status column in the
/// selected mode.
pub fn print_table(db: &Database, views: &[TaskView], mode: StatusMode, now: DateTime<Utc>) {
    println!(
        "{:<5} {:<12} {:<8} {:<10} {:<14} {}",
        "ID", "Status", "Pri", "Due", "Project", "Title [tags]"
    );
    let today = Local::now().date_naive();
    for view in views {
        let shaped = view.clone().into_mode(mode);
        let (id, status_label, due, project_id, title, tags) = match &shaped {
            TaskView::Custom(t) => (
                t.id,
                t.status.label(),
                t.due,
                t.project_id,
                t.title.clone(),
                t.tags.clone(),
            ),
            TaskView::Traditional(t) => (
                t.id,
                t.status.label(),
                t.due,
                t.project_id,
                t.title.clone(),
                t.tags.clone(),
            ),
        };
        let project = project_id
            .and_then(|pid| db.get_project(pid))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "-".into());
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(","))
        };
        let marker = if shaped.is_overdue(now) { "!" } else { "" };
        println!(
            "{:<5} {:<12} {:<8} {:<10} {:<14} {}{}{}",
            id,
            status_label,
            shaped.priority().label(),
            format_due_relative(due, today),
            truncate(&project, 14),
            title,
            tags,
            marker
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_normalise_tags() {
        let tags = split_and_normalise_tags(&[
            "Backend, infra".to_string(),
            "infra".to_string(),
            " UI polish ".to_string(),
        ]);
        assert_eq!(tags, vec!["backend", "infra", "ui-polish"]);
    }

    #[test]
    fn test_parse_status_query_respects_mode() {
        assert_eq!(
            parse_status_query("urgent", StatusMode::Custom).unwrap(),
            StatusQuery::Custom(CustomStatus::Urgent)
        );
        assert_eq!(
            parse_status_query("in_progress", StatusMode::Traditional).unwrap(),
            StatusQuery::Traditional(TraditionalStatus::InProgress)
        );
        // A custom value in traditional mode is invalid, not coerced.
        assert!(parse_status_query("priority_2", StatusMode::Traditional).is_err());
        assert!(parse_status_query("todo", StatusMode::Custom).is_err());
    }

    #[test]
    fn test_parse_due_formats() {
        assert!(parse_due(None).unwrap().is_none());
        assert!(parse_due(Some("today")).unwrap().is_some());
        assert!(parse_due(Some("tomorrow")).unwrap().is_some());
        assert!(parse_due(Some("in 3d")).unwrap().is_some());
        assert!(parse_due(Some("in 2w")).unwrap().is_some());
        assert!(parse_due(Some("2026-12-01")).unwrap().is_some());
        assert!(parse_due(Some("whenever")).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long project name", 10), "a very lo…");
    }
}
