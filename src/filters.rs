//! Filter and grouping projections over the task list.
//!
//! Pure functions, recomputed on every call, no caching. Archived records
//! never appear in any bucket.

use crate::model::{Role, Task, TaskPriority, TaskStatus, User};

/// Row-level filter: an exact priority (or all), and — for Developer
/// viewers — a restriction to their own tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// `None` means "All".
    pub priority: Option<TaskPriority>,
    /// When set, only tasks assigned to this user match.
    pub assignee: Option<i32>,
}

impl TaskFilter {
    /// The filter a given viewer sees: Managers see everyone's tasks,
    /// Developers are always restricted to their own, whatever the
    /// priority filter says.
    pub fn for_viewer(viewer: &User, priority: Option<TaskPriority>) -> Self {
        TaskFilter {
            priority,
            assignee: (viewer.role == Role::Developer).then_some(viewer.id),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if task.archived {
            return false;
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(assignee) = self.assignee {
            if task.assigned_to != Some(assignee) {
                return false;
            }
        }
        true
    }
}

/// The four disjoint status buckets the board renders.
#[derive(Debug, Default)]
pub struct StatusBuckets<'a> {
    pub pending: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub in_review: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl<'a> StatusBuckets<'a> {
    pub fn bucket(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Pending => &self.pending,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::InReview => &self.in_review,
            TaskStatus::Completed => &self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.pending.len() + self.in_progress.len() + self.in_review.len() + self.completed.len()
    }

    pub fn contains(&self, id: i32) -> bool {
        [&self.pending, &self.in_progress, &self.in_review, &self.completed]
            .iter()
            .any(|bucket| bucket.iter().any(|t| t.id == id))
    }
}

/// Apply the filter and keep a deterministic order: newest creation
/// timestamp first, with list insertion order (creates prepend, so also
/// newest-first) as the stable tiebreak for equal or missing timestamps.
fn filtered<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let mut matching: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching
}

/// Partition the filtered list into the four status buckets.
pub fn group_by_status<'a>(tasks: &'a [Task], filter: &TaskFilter) -> StatusBuckets<'a> {
    let mut buckets = StatusBuckets::default();
    for task in filtered(tasks, filter) {
        match task.status {
            TaskStatus::Pending => buckets.pending.push(task),
            TaskStatus::InProgress => buckets.in_progress.push(task),
            TaskStatus::InReview => buckets.in_review.push(task),
            TaskStatus::Completed => buckets.completed.push(task),
        }
    }
    buckets
}

/// The backlog: filtered tasks with no sprint assigned.
pub fn backlog<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    filtered(tasks, filter)
        .into_iter()
        .filter(|t| t.is_backlog())
        .collect()
}

/// Tasks in one sprint after filtering.
pub fn in_sprint<'a>(tasks: &'a [Task], filter: &TaskFilter, sprint_id: i32) -> Vec<&'a Task> {
    filtered(tasks, filter)
        .into_iter()
        .filter(|t| t.sprint_id == Some(sprint_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(id: i32, status: TaskStatus, priority: TaskPriority) -> Task {
        Task {
            id,
            description: format!("task {id}"),
            done: status == TaskStatus::Completed,
            status,
            priority,
            steps: String::new(),
            created_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, id as u32 % 60).unwrap()),
            assigned_to: None,
            created_by: None,
            archived: false,
            estimated_hours: None,
            actual_hours: None,
            sprint_id: None,
        }
    }

    fn viewer(role: Role, id: i32) -> User {
        User {
            id,
            username: "u".into(),
            name: None,
            role,
            phone: None,
        }
    }

    #[test]
    fn test_priority_filter_is_exact() {
        let tasks = vec![
            task(1, TaskStatus::Pending, TaskPriority::High),
            task(2, TaskStatus::Pending, TaskPriority::Critical),
            task(3, TaskStatus::Pending, TaskPriority::Medium),
        ];
        let filter = TaskFilter { priority: Some(TaskPriority::High), ..Default::default() };
        let buckets = group_by_status(&tasks, &filter);
        assert_eq!(buckets.pending.len(), 1);
        assert_eq!(buckets.pending[0].id, 1);
    }

    #[test]
    fn test_all_priorities_returns_unfiltered_set() {
        let tasks = vec![
            task(1, TaskStatus::Pending, TaskPriority::High),
            task(2, TaskStatus::InProgress, TaskPriority::Low),
            task(3, TaskStatus::Completed, TaskPriority::Critical),
        ];
        let buckets = group_by_status(&tasks, &TaskFilter::default());
        assert_eq!(buckets.total(), 3);
    }

    #[test]
    fn test_buckets_are_disjoint_and_keyed_by_status() {
        let tasks = vec![
            task(1, TaskStatus::Pending, TaskPriority::Medium),
            task(2, TaskStatus::InProgress, TaskPriority::Medium),
            task(3, TaskStatus::InReview, TaskPriority::Medium),
            task(4, TaskStatus::Completed, TaskPriority::Medium),
        ];
        let buckets = group_by_status(&tasks, &TaskFilter::default());
        assert_eq!(buckets.pending.len(), 1);
        assert_eq!(buckets.in_progress.len(), 1);
        assert_eq!(buckets.in_review.len(), 1);
        assert_eq!(buckets.completed.len(), 1);
        assert_eq!(buckets.bucket(TaskStatus::InReview)[0].id, 3);
    }

    #[test]
    fn test_developer_filter_restricts_to_own_tasks_regardless_of_priority() {
        let mut mine = task(1, TaskStatus::Pending, TaskPriority::High);
        mine.assigned_to = Some(7);
        let mut other = task(2, TaskStatus::Pending, TaskPriority::High);
        other.assigned_to = Some(8);
        let unassigned = task(3, TaskStatus::Pending, TaskPriority::High);
        let tasks = vec![mine, other, unassigned];

        let dev = viewer(Role::Developer, 7);
        for priority in [None, Some(TaskPriority::High)] {
            let filter = TaskFilter::for_viewer(&dev, priority);
            let buckets = group_by_status(&tasks, &filter);
            assert_eq!(buckets.total(), 1);
            assert_eq!(buckets.pending[0].id, 1);
        }
    }

    #[test]
    fn test_manager_sees_everything() {
        let mut assigned = task(1, TaskStatus::Pending, TaskPriority::Low);
        assigned.assigned_to = Some(3);
        let tasks = vec![assigned, task(2, TaskStatus::Pending, TaskPriority::Low)];
        let filter = TaskFilter::for_viewer(&viewer(Role::Manager, 1), None);
        assert_eq!(group_by_status(&tasks, &filter).total(), 2);
    }

    #[test]
    fn test_backlog_holds_only_sprintless_tasks() {
        let mut sprinted = task(1, TaskStatus::Pending, TaskPriority::Medium);
        sprinted.sprint_id = Some(4);
        let loose = task(2, TaskStatus::Pending, TaskPriority::Medium);
        let tasks = vec![sprinted, loose];

        let backlog = backlog(&tasks, &TaskFilter::default());
        assert_eq!(backlog.len(), 1);
        assert_eq!(backlog[0].id, 2);

        let in_sprint_4 = in_sprint(&tasks, &TaskFilter::default(), 4);
        assert_eq!(in_sprint_4.len(), 1);
        assert_eq!(in_sprint_4[0].id, 1);
    }

    #[test]
    fn test_archived_tasks_are_excluded_everywhere() {
        let mut gone = task(1, TaskStatus::Pending, TaskPriority::Medium);
        gone.archived = true;
        let tasks = vec![gone, task(2, TaskStatus::Pending, TaskPriority::Medium)];
        let buckets = group_by_status(&tasks, &TaskFilter::default());
        assert_eq!(buckets.total(), 1);
        assert!(!buckets.contains(1));
        assert!(backlog(&tasks, &TaskFilter::default()).iter().all(|t| t.id != 1));
    }

    #[test]
    fn test_ordering_is_newest_created_first() {
        // Insertion order is oldest-first here; the projector re-sorts.
        let tasks = vec![
            task(1, TaskStatus::Pending, TaskPriority::Medium), // :01
            task(30, TaskStatus::Pending, TaskPriority::Medium), // :30
            task(15, TaskStatus::Pending, TaskPriority::Medium), // :15
        ];
        let buckets = group_by_status(&tasks, &TaskFilter::default());
        let ids: Vec<i32> = buckets.pending.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![30, 15, 1]);
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let mut a = task(1, TaskStatus::Pending, TaskPriority::Medium);
        let mut b = task(2, TaskStatus::Pending, TaskPriority::Medium);
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        a.created_at = Some(ts);
        b.created_at = Some(ts);
        // Creates prepend, so the newer record sits at the head already.
        let tasks = vec![b, a];
        let buckets = group_by_status(&tasks, &TaskFilter::default());
        let ids: Vec<i32> = buckets.pending.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
