//! Domain entities and their wire shapes.
//!
//! The backend is duck-typed in places (optional fields, `ID` vs `id`
//! casing between dashboard eras, `isArchived` as either an integer flag or
//! a boolean). Everything is validated and normalized here at the boundary:
//! one wire record type per entity, one projection into the shape the rest
//! of the client uses, and real enums for status/priority/role so unknown
//! strings fail at decode time instead of leaking through.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Task workflow status.
///
/// Wire values are the human-readable strings the backend stores
/// (`"In Progress"`, not `in_progress`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "In Review")]
    InReview,
    Completed,
}

impl TaskStatus {
    /// The next stage in the workflow. `Completed` is terminal.
    pub fn next(self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::InReview,
            TaskStatus::InReview | TaskStatus::Completed => TaskStatus::Completed,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "Pending"),
            TaskStatus::InProgress => write!(f, "In Progress"),
            TaskStatus::InReview => write!(f, "In Review"),
            TaskStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "inprogress" => Ok(TaskStatus::InProgress),
            "inreview" => Ok(TaskStatus::InReview),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => anyhow::bail!(
                "Invalid status '{}'. Valid values: pending, in-progress, in-review, completed",
                s
            ),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "Low"),
            TaskPriority::Medium => write!(f, "Medium"),
            TaskPriority::High => write!(f, "High"),
            TaskPriority::Critical => write!(f, "Critical"),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "critical" => Ok(TaskPriority::Critical),
            _ => anyhow::bail!(
                "Invalid priority '{}'. Valid values: low, medium, high, critical",
                s
            ),
        }
    }
}

/// User role. The backend enforces nothing; the client hides operations by
/// role and the server remains the real authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Manager,
    Developer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Manager => write!(f, "Manager"),
            Role::Developer => write!(f, "Developer"),
        }
    }
}

/// `isArchived` arrives as `0`/`1` from the ORM and as a boolean from newer
/// code paths. Accept both.
fn de_int_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }
    Ok(Option::<Flag>::deserialize(deserializer)?.map(|f| match f {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    }))
}

fn ser_int_flag<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(b) => serializer.serialize_i64(if *b { 1 } else { 0 }),
        None => serializer.serialize_none(),
    }
}

/// A task exactly as the backend sends it. Deserialized, then immediately
/// projected into [`Task`]; nothing else in the client touches this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(alias = "ID")]
    pub id: i32,
    pub description: String,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub steps: Option<String>,
    #[serde(default)]
    pub creation_ts: Option<DateTime<Utc>>,
    #[serde(default, rename = "assignedTo")]
    pub assigned_to: Option<i32>,
    #[serde(default, rename = "createdBy")]
    pub created_by: Option<i32>,
    #[serde(
        default,
        rename = "isArchived",
        deserialize_with = "de_int_flag",
        serialize_with = "ser_int_flag"
    )]
    pub is_archived: Option<bool>,
    #[serde(default, rename = "estimatedHours")]
    pub estimated_hours: Option<f64>,
    #[serde(default, rename = "actualHours")]
    pub actual_hours: Option<f64>,
    #[serde(default, rename = "sprintId")]
    pub sprint_id: Option<i32>,
}

impl TaskRecord {
    /// The one projection from wire shape to view model.
    ///
    /// Called from every path that produces a [`Task`] — initial list load,
    /// single-record reload, and the optimistic local insert after create —
    /// so the three can never drift apart. Defaults: status Pending,
    /// priority Medium, steps empty. `created_at` is taken from
    /// `creation_ts`.
    pub fn project(self) -> Task {
        Task {
            id: self.id,
            description: self.description,
            done: self.done.unwrap_or(false),
            status: self.status.unwrap_or(TaskStatus::Pending),
            priority: self.priority.unwrap_or(TaskPriority::Medium),
            steps: self.steps.unwrap_or_default(),
            created_at: self.creation_ts,
            assigned_to: self.assigned_to,
            created_by: self.created_by,
            archived: self.is_archived.unwrap_or(false),
            estimated_hours: self.estimated_hours,
            actual_hours: self.actual_hours,
            sprint_id: self.sprint_id,
        }
    }
}

/// The normalized task the rest of the client works with.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: i32,
    pub description: String,
    /// Legacy completion flag, kept consistent with `status` (see
    /// [`Task::set_done`]).
    pub done: bool,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Free text, newline-delimited.
    pub steps: String,
    pub created_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<i32>,
    pub created_by: Option<i32>,
    pub archived: bool,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    /// `None` means the task sits in the backlog.
    pub sprint_id: Option<i32>,
}

impl Task {
    /// Whether the task lives outside any sprint.
    pub fn is_backlog(&self) -> bool {
        self.sprint_id.is_none()
    }

    /// Flip the legacy `done` flag, keeping `status` consistent:
    /// done implies Completed, and moving off done reverts a Completed
    /// task to In Progress.
    pub fn set_done(&mut self, done: bool) {
        self.done = done;
        if done {
            self.status = TaskStatus::Completed;
        } else if self.status == TaskStatus::Completed {
            self.status = TaskStatus::InProgress;
        }
    }

    /// Wire shape for a PUT full replace.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            description: self.description.clone(),
            done: Some(self.done),
            status: Some(self.status),
            priority: Some(self.priority),
            steps: Some(self.steps.clone()),
            creation_ts: self.created_at,
            assigned_to: self.assigned_to,
            created_by: self.created_by,
            is_archived: Some(self.archived),
            estimated_hours: self.estimated_hours,
            actual_hours: self.actual_hours,
            sprint_id: self.sprint_id,
        }
    }
}

/// POST /todolist body. Field names are a strict wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub description: String,
    pub done: bool,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub steps: String,
    pub creation_ts: DateTime<Utc>,
    #[serde(rename = "sprintId")]
    pub sprint_id: Option<i32>,
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<i32>,
    #[serde(rename = "createdBy")]
    pub created_by: Option<i32>,
    #[serde(rename = "estimatedHours")]
    pub estimated_hours: Option<f64>,
}

/// A sprint. Read-only from this client after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "createdBy")]
    pub created_by: Option<i32>,
}

/// POST /sprints body. The end date is derived client-side as
/// start date + N weeks.
#[derive(Debug, Clone, Serialize)]
pub struct NewSprint {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    #[serde(rename = "createdBy")]
    pub created_by: Option<i32>,
}

impl NewSprint {
    pub fn spanning_weeks(
        name: String,
        description: Option<String>,
        start_date: NaiveDate,
        weeks: u32,
        created_by: Option<i32>,
    ) -> Self {
        NewSprint {
            name,
            description,
            start_date,
            end_date: start_date + chrono::Duration::weeks(i64::from(weeks)),
            created_by,
        }
    }
}

/// A user record. The backend ships the password over the wire (a known
/// backend defect); this client never persists or compares it.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(alias = "ID")]
    pub id: i32,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
}

impl User {
    /// Display label: full name when the backend has one.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }
}

/// Team KPI snapshot for one sprint. Derived server-side and fetched fresh;
/// never mutated by the client. The backend returns an empty object for an
/// unknown sprint, so every field defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamKpi {
    #[serde(default)]
    pub sprint_id: Option<i32>,
    #[serde(default)]
    pub sprint_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub total_estimated_hours: f64,
    #[serde(default)]
    pub total_actual_hours: f64,
    /// Estimated over actual hours for completed work, as a percentage.
    #[serde(default)]
    pub efficiency: f64,
}

/// Per-developer KPI snapshot for one sprint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKpi {
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub sprint_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub total_estimated_hours: f64,
    #[serde(default)]
    pub total_actual_hours: f64,
    #[serde(default)]
    pub efficiency: f64,
    #[serde(default)]
    pub tasks: Vec<UserKpiTask>,
}

/// Detail row inside a [`UserKpi`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKpiTask {
    pub id: i32,
    pub description: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub actual_hours: f64,
    #[serde(default)]
    pub completed: bool,
}

/// Row from GET /reports/sprint/{id}/completed-tasks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTask {
    pub id: i32,
    pub description: String,
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub actual_hours: f64,
    #[serde(default)]
    pub developer_name: Option<String>,
    #[serde(default)]
    pub developer_id: Option<i32>,
}

impl CompletedTask {
    /// Estimated/actual percentage, `None` when no hours were logged.
    pub fn efficiency(&self) -> Option<f64> {
        (self.actual_hours > 0.0).then(|| self.estimated_hours / self.actual_hours * 100.0)
    }
}

/// Row from GET /reports/sprints/summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintSummary {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub total_estimated_hours: f64,
    #[serde(default)]
    pub total_actual_hours: f64,
}

/// A repository branch as flattened by the backend's GitHub proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub commit_url: Option<String>,
}

/// POST /github/branches body.
#[derive(Debug, Clone, Serialize)]
pub struct BranchRequest {
    pub owner: String,
    pub repo: String,
    #[serde(rename = "newBranchName")]
    pub new_branch_name: String,
    #[serde(rename = "baseBranch")]
    pub base_branch: String,
    #[serde(rename = "taskId")]
    pub task_id: i32,
}
