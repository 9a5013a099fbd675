//! Filtering, sorting, and aggregation over mixed-shape task lists.
//!
//! All functions here take task views in either representation and convert
//! the relevant axis on the fly, so callers never need to normalise a list
//! before querying it. Nothing in this module mutates its input.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Duration, Utc};
use clap::ValueEnum;

use crate::convert::custom_to_traditional;
use crate::status::{CustomStatus, PriorityLevel, StatusMode, TraditionalStatus};
use crate::task::{Task, TaskView};

/// A status to filter by, tagged with the system it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusQuery {
    Custom(CustomStatus),
    Traditional(TraditionalStatus),
}

/// Sort direction, shared by field sorts and the urgency sort.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Stored fields the list can be ordered by.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortField {
    Due,
    Created,
    Updated,
    Priority,
    Title,
}

/// A field sort for the list query: which column, which way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Sort keys accepted on the command line. `urgency` orders by the computed
/// score; the rest order by a stored field via [`TaskSort`].
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    Urgency,
    Due,
    Created,
    Updated,
    Priority,
    Title,
}

impl SortKey {
    pub fn as_field(self) -> Option<SortField> {
        match self {
            SortKey::Urgency => None,
            SortKey::Due => Some(SortField::Due),
            SortKey::Created => Some(SortField::Created),
            SortKey::Updated => Some(SortField::Updated),
            SortKey::Priority => Some(SortField::Priority),
            SortKey::Title => Some(SortField::Title),
        }
    }
}

/// Due-date windows for the list query, relative to `now`.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DueWindow {
    Overdue,
    Today,
    ThisWeek,
    ThisMonth,
}

/// Filters applied by the list query. All fields are conjunctive. Status
/// filtering is not here: it runs on views via [`filter_by_status`], so it
/// can match either axis of a mixed-shape list.
#[derive(Debug, Clone, Default)]
pub struct TaskFilters {
    pub priority: Option<PriorityLevel>,
    pub project: Option<u64>,
    pub assignee: Option<String>,
    pub tag: Option<String>,
    pub due: Option<DueWindow>,
    pub search: Option<String>,
}

/// Keep only the tasks whose status matches, comparing on the axis the query
/// names and converting each task as needed.
pub fn filter_by_status(tasks: &[TaskView], status: StatusQuery) -> Vec<TaskView> {
    tasks
        .iter()
        .filter(|task| match status {
            StatusQuery::Custom(wanted) => task.custom_status() == wanted,
            StatusQuery::Traditional(wanted) => task.traditional_status() == wanted,
        })
        .cloned()
        .collect()
}

/// Stable sort by urgency score; tied tasks keep their input order.
pub fn sort_by_urgency(
    tasks: &[TaskView],
    direction: SortDirection,
    now: DateTime<Utc>,
) -> Vec<TaskView> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|task| {
        let score = task.urgency(now) as i64;
        match direction {
            SortDirection::Asc => score,
            SortDirection::Desc => -score,
        }
    });
    sorted
}

/// Status tallies for dashboard summaries. Every task lands in exactly one
/// status bucket for its mode, so the buckets sum to `total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCounts {
    Custom {
        urgent: usize,
        priority_2: usize,
        priority_3: usize,
        done: usize,
        overdue: usize,
        total: usize,
    },
    Traditional {
        todo: usize,
        in_progress: usize,
        done: usize,
        /// Tallies per priority level, indexed by value - 1.
        priority: [usize; 4],
        overdue: usize,
        total: usize,
    },
}

/// Tally tasks per status bucket in the requested mode, plus overdue and
/// total counts.
pub fn status_counts(tasks: &[TaskView], mode: StatusMode, now: DateTime<Utc>) -> StatusCounts {
    let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();
    let total = tasks.len();

    match mode {
        StatusMode::Custom => {
            let mut urgent = 0;
            let mut priority_2 = 0;
            let mut priority_3 = 0;
            let mut done = 0;
            for task in tasks {
                match task.custom_status() {
                    CustomStatus::Urgent => urgent += 1,
                    CustomStatus::Priority2 => priority_2 += 1,
                    CustomStatus::Priority3 => priority_3 += 1,
                    CustomStatus::Done => done += 1,
                }
            }
            StatusCounts::Custom {
                urgent,
                priority_2,
                priority_3,
                done,
                overdue,
                total,
            }
        }
        StatusMode::Traditional => {
            let mut todo = 0;
            let mut in_progress = 0;
            let mut done = 0;
            let mut priority = [0usize; 4];
            for task in tasks {
                match task.traditional_status() {
                    TraditionalStatus::Todo => todo += 1,
                    TraditionalStatus::InProgress => in_progress += 1,
                    TraditionalStatus::Done => done += 1,
                }
                priority[task.priority().value() as usize - 1] += 1;
            }
            StatusCounts::Traditional {
                todo,
                in_progress,
                done,
                priority,
                overdue,
                total,
            }
        }
    }
}

/// Apply the list filters to stored tasks. Returns matching tasks in their
/// input order; an assignee or tag that matches nothing yields an empty list.
pub fn apply_filters(tasks: &[Task], filters: &TaskFilters, now: DateTime<Utc>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| {
            if let Some(priority) = filters.priority {
                if TaskView::Custom((*task).clone()).priority() != priority {
                    return false;
                }
            }
            if let Some(project) = filters.project {
                if task.project_id != Some(project) {
                    return false;
                }
            }
            if let Some(ref assignee) = filters.assignee {
                if !task.assignees.iter().any(|a| a == assignee) {
                    return false;
                }
            }
            if let Some(ref tag) = filters.tag {
                if !task.tags.iter().any(|t| t == tag) {
                    return false;
                }
            }
            if let Some(window) = filters.due {
                if !due_in_window(task.due, window, now) {
                    return false;
                }
            }
            if let Some(ref needle) = filters.search {
                let needle = needle.to_lowercase();
                let in_title = task.title.to_lowercase().contains(&needle);
                let in_desc = task
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle));
                if !in_title && !in_desc {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

/// Stable sort by a stored field. Tasks without a due date sort after dated
/// ones; titles compare case-insensitively; priority uses the effective
/// level (persisted, else derived from the master status).
pub fn sort_tasks(tasks: &[Task], sort: &TaskSort) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        let ord = match sort.field {
            SortField::Due => cmp_due(a.due, b.due),
            SortField::Created => a.created_at_utc.cmp(&b.created_at_utc),
            SortField::Updated => a.updated_at_utc.cmp(&b.updated_at_utc),
            SortField::Priority => effective_priority(a).cmp(&effective_priority(b)),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}

fn effective_priority(task: &Task) -> PriorityLevel {
    task.priority_level
        .unwrap_or_else(|| custom_to_traditional(task.status).1)
}

fn cmp_due(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn due_in_window(due: Option<DateTime<Utc>>, window: DueWindow, now: DateTime<Utc>) -> bool {
    let Some(due) = due else {
        return false;
    };
    let today = now.date_naive();
    match window {
        DueWindow::Overdue => due < now,
        DueWindow::Today => due.date_naive() == today,
        DueWindow::ThisWeek => {
            let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            let end = start + Duration::days(6);
            let d = due.date_naive();
            d >= start && d <= end
        }
        DueWindow::ThisMonth => {
            let d = due.date_naive();
            d.year() == today.year() && d.month() == today.month()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::tests::{sample_task, sample_traditional};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn view_id(view: &TaskView) -> u64 {
        match view {
            TaskView::Custom(t) => t.id,
            TaskView::Traditional(t) => t.id,
        }
    }

    #[test]
    fn test_filter_by_custom_status() {
        let tasks = vec![
            TaskView::Custom(sample_task(1, CustomStatus::Urgent)),
            TaskView::Custom(sample_task(2, CustomStatus::Done)),
        ];
        let done = filter_by_status(&tasks, StatusQuery::Custom(CustomStatus::Done));
        assert_eq!(done.len(), 1);
        assert_eq!(view_id(&done[0]), 2);
    }

    #[test]
    fn test_filter_converts_traditional_tasks_on_the_fly() {
        let tasks = vec![
            TaskView::Traditional(sample_traditional(
                1,
                TraditionalStatus::InProgress,
                PriorityLevel::Urgent,
            )),
            TaskView::Traditional(sample_traditional(
                2,
                TraditionalStatus::Todo,
                PriorityLevel::Low,
            )),
            TaskView::Custom(sample_task(3, CustomStatus::Urgent)),
        ];
        // in_progress + priority 4 lands in the urgent bucket.
        let urgent = filter_by_status(&tasks, StatusQuery::Custom(CustomStatus::Urgent));
        assert_eq!(urgent.len(), 2);
        assert_eq!(view_id(&urgent[0]), 1);
        assert_eq!(view_id(&urgent[1]), 3);
    }

    #[test]
    fn test_filter_by_traditional_status_converts_custom_tasks() {
        let mut no_axis = sample_task(1, CustomStatus::Priority2);
        no_axis.traditional_status = None;
        let tasks = vec![
            TaskView::Custom(no_axis),
            TaskView::Traditional(sample_traditional(
                2,
                TraditionalStatus::InProgress,
                PriorityLevel::Medium,
            )),
        ];
        let todo = filter_by_status(&tasks, StatusQuery::Traditional(TraditionalStatus::Todo));
        assert_eq!(todo.len(), 1);
        assert_eq!(view_id(&todo[0]), 1);
    }

    #[test]
    fn test_sort_by_urgency_is_stable() {
        let now = at(2026, 3, 10, 12);
        let tasks = vec![
            TaskView::Custom(sample_task(1, CustomStatus::Priority3)),
            TaskView::Custom(sample_task(2, CustomStatus::Urgent)),
            TaskView::Custom(sample_task(3, CustomStatus::Priority3)),
            TaskView::Custom(sample_task(4, CustomStatus::Priority2)),
        ];
        let sorted = sort_by_urgency(&tasks, SortDirection::Desc, now);
        let ids: Vec<u64> = sorted.iter().map(view_id).collect();
        // Ties (1 and 3) keep their input order.
        assert_eq!(ids, vec![2, 4, 1, 3]);

        let ascending = sort_by_urgency(&tasks, SortDirection::Asc, now);
        let ids: Vec<u64> = ascending.iter().map(view_id).collect();
        assert_eq!(ids, vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_sort_tasks_by_due_puts_undated_last() {
        let mut early = sample_task(1, CustomStatus::Priority3);
        early.due = Some(at(2026, 3, 2, 9));
        let undated = sample_task(2, CustomStatus::Priority3);
        let mut late = sample_task(3, CustomStatus::Priority3);
        late.due = Some(at(2026, 3, 20, 9));
        let tasks = vec![late, undated, early];

        let sort = TaskSort {
            field: SortField::Due,
            direction: SortDirection::Asc,
        };
        let ids: Vec<u64> = sort_tasks(&tasks, &sort).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn test_sort_tasks_by_priority_uses_effective_level() {
        // No persisted level: the master status supplies it.
        let mut urgent = sample_task(1, CustomStatus::Urgent);
        urgent.priority_level = None;
        let medium = sample_task(2, CustomStatus::Priority3);
        let tasks = vec![medium, urgent];

        let sort = TaskSort {
            field: SortField::Priority,
            direction: SortDirection::Desc,
        };
        let ids: Vec<u64> = sort_tasks(&tasks, &sort).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_sort_tasks_by_title_ignores_case() {
        let mut a = sample_task(1, CustomStatus::Priority3);
        a.title = "zebra".into();
        let mut b = sample_task(2, CustomStatus::Priority3);
        b.title = "Apple".into();
        let tasks = vec![a, b];

        let sort = TaskSort {
            field: SortField::Title,
            direction: SortDirection::Asc,
        };
        let ids: Vec<u64> = sort_tasks(&tasks, &sort).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_sort_tasks_by_created_is_stable_on_ties() {
        let mut old = sample_task(1, CustomStatus::Priority3);
        old.created_at_utc = 1_600_000_000;
        // Helpers share a creation timestamp, so 2 and 3 tie.
        let tasks = vec![
            sample_task(2, CustomStatus::Priority3),
            old,
            sample_task(3, CustomStatus::Priority3),
        ];

        let sort = TaskSort {
            field: SortField::Created,
            direction: SortDirection::Asc,
        };
        let ids: Vec<u64> = sort_tasks(&tasks, &sort).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_key_maps_to_stored_fields() {
        assert_eq!(SortKey::Urgency.as_field(), None);
        assert_eq!(SortKey::Due.as_field(), Some(SortField::Due));
        assert_eq!(SortKey::Updated.as_field(), Some(SortField::Updated));
    }

    #[test]
    fn test_custom_counts_sum_to_total() {
        let now = at(2026, 3, 10, 12);
        let mut overdue_task = sample_task(4, CustomStatus::Priority2);
        overdue_task.due = Some(at(2026, 3, 1, 0));
        let tasks = vec![
            TaskView::Custom(sample_task(1, CustomStatus::Urgent)),
            TaskView::Custom(sample_task(2, CustomStatus::Urgent)),
            TaskView::Custom(sample_task(3, CustomStatus::Done)),
            TaskView::Custom(overdue_task),
            TaskView::Traditional(sample_traditional(
                5,
                TraditionalStatus::Todo,
                PriorityLevel::Low,
            )),
        ];
        match status_counts(&tasks, StatusMode::Custom, now) {
            StatusCounts::Custom {
                urgent,
                priority_2,
                priority_3,
                done,
                overdue,
                total,
            } => {
                assert_eq!(urgent, 2);
                assert_eq!(priority_2, 1);
                assert_eq!(priority_3, 1);
                assert_eq!(done, 1);
                assert_eq!(overdue, 1);
                assert_eq!(total, 5);
                assert_eq!(urgent + priority_2 + priority_3 + done, total);
            }
            StatusCounts::Traditional { .. } => panic!("wrong mode"),
        }
    }

    #[test]
    fn test_traditional_counts_include_priority_tallies() {
        let now = at(2026, 3, 10, 12);
        let tasks = vec![
            TaskView::Custom(sample_task(1, CustomStatus::Urgent)),
            TaskView::Traditional(sample_traditional(
                2,
                TraditionalStatus::InProgress,
                PriorityLevel::Low,
            )),
            TaskView::Traditional(sample_traditional(
                3,
                TraditionalStatus::Done,
                PriorityLevel::Medium,
            )),
        ];
        match status_counts(&tasks, StatusMode::Traditional, now) {
            StatusCounts::Traditional {
                todo,
                in_progress,
                done,
                priority,
                overdue,
                total,
            } => {
                assert_eq!(todo, 1);
                assert_eq!(in_progress, 1);
                assert_eq!(done, 1);
                assert_eq!(priority, [1, 1, 0, 1]);
                assert_eq!(overdue, 0);
                assert_eq!(total, 3);
            }
            StatusCounts::Custom { .. } => panic!("wrong mode"),
        }
    }

    #[test]
    fn test_counts_total_matches_input_length_for_empty_list() {
        let now = at(2026, 3, 10, 12);
        match status_counts(&[], StatusMode::Custom, now) {
            StatusCounts::Custom { total, overdue, .. } => {
                assert_eq!(total, 0);
                assert_eq!(overdue, 0);
            }
            StatusCounts::Traditional { .. } => panic!("wrong mode"),
        }
    }

    #[test]
    fn test_apply_filters_assignee_without_matches_is_empty() {
        let now = at(2026, 3, 10, 12);
        let mut task = sample_task(1, CustomStatus::Urgent);
        task.assignees = vec!["alice".into()];
        let tasks = vec![task];

        let filters = TaskFilters {
            assignee: Some("bob".into()),
            ..Default::default()
        };
        assert!(apply_filters(&tasks, &filters, now).is_empty());

        let filters = TaskFilters {
            assignee: Some("alice".into()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&tasks, &filters, now).len(), 1);
    }

    #[test]
    fn test_apply_filters_search_and_due_window() {
        let now = at(2026, 3, 10, 12);
        let mut a = sample_task(1, CustomStatus::Priority3);
        a.title = "Write release notes".into();
        a.due = Some(at(2026, 3, 10, 18));
        let mut b = sample_task(2, CustomStatus::Priority3);
        b.description = Some("notes for the retro".into());
        b.due = Some(at(2026, 4, 2, 9));
        let tasks = vec![a, b];

        let filters = TaskFilters {
            search: Some("NOTES".into()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&tasks, &filters, now).len(), 2);

        let filters = TaskFilters {
            due: Some(DueWindow::Today),
            ..Default::default()
        };
        let hits = apply_filters(&tasks, &filters, now);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let filters = TaskFilters {
            due: Some(DueWindow::ThisMonth),
            ..Default::default()
        };
        assert_eq!(apply_filters(&tasks, &filters, now).len(), 1);
    }
}
