//! MCP request and response models.
//!
//! Parameter records are what the host sends for each tool; they derive
//! `JsonSchema` so the tool catalog advertises their shape. Response records
//! are structured results; turning them into text happens in
//! [`crate::render`].

use chrono::NaiveDate;
use redmine::domain::{
    Activity, AssigneeFilter, Issue, IssueStatus, Project, ProjectRef, TimeEntry,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default page size for task listings.
pub const DEFAULT_TASK_LIMIT: u32 = 25;

/// An argument that accepts either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum IdOrKey {
    /// Numeric id.
    Id(u64),
    /// Slug or keyword (`me`, `open`, ...). All-digit strings are read as ids.
    Key(String),
}

impl IdOrKey {
    /// Interpret as a project reference.
    #[must_use]
    pub fn into_project_ref(self) -> ProjectRef {
        match self {
            Self::Id(id) => ProjectRef::Id(id),
            Self::Key(key) => ProjectRef::parse(key),
        }
    }

    /// Interpret as an assignee filter.
    #[must_use]
    pub fn into_assignee(self) -> AssigneeFilter {
        match self {
            Self::Id(id) => AssigneeFilter::Id(id),
            Self::Key(key) => match key.trim().parse::<u64>() {
                Ok(id) => AssigneeFilter::Id(id),
                Err(_) => AssigneeFilter::Keyword(key),
            },
        }
    }

    /// Interpret as a status filter (`open`, `closed`, `*`, or an id).
    #[must_use]
    pub fn into_status_filter(self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Key(key) => key,
        }
    }
}

// ============================================================================
// Tool parameters
// ============================================================================

/// Parameters for `create_task`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CreateTaskParams {
    /// Project ID or identifier (uses current project if not specified).
    #[serde(default)]
    pub project_id: Option<IdOrKey>,

    /// Task subject/title.
    pub subject: String,

    /// Detailed description of the task.
    #[serde(default)]
    pub description: Option<String>,

    /// Tracker ID (e.g., 1=Bug, 2=Feature, 3=Support).
    #[serde(default)]
    pub tracker_id: Option<u64>,

    /// Status ID (e.g., 1=New).
    #[serde(default)]
    pub status_id: Option<u64>,

    /// Priority ID (e.g., 2=Normal).
    #[serde(default)]
    pub priority_id: Option<u64>,

    /// User ID to assign the task to (defaults to the current user).
    #[serde(default)]
    pub assigned_to_id: Option<u64>,

    /// Parent task ID, to create a subtask.
    #[serde(default)]
    pub parent_issue_id: Option<u64>,

    /// Estimated hours for completion.
    #[serde(default)]
    pub estimated_hours: Option<f64>,
}

/// Parameters for `get_task`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GetTaskParams {
    /// The ID of the task (uses current task if not specified).
    #[serde(default)]
    pub issue_id: Option<u64>,

    /// Additional data to include (children, attachments, relations,
    /// changesets, journals, watchers).
    #[serde(default)]
    pub include: Option<Vec<String>>,
}

/// Parameters for `update_task`. Only supplied fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTaskParams {
    /// The ID of the task to update (uses current task if not specified).
    #[serde(default)]
    pub issue_id: Option<u64>,

    /// New subject/title.
    #[serde(default)]
    pub subject: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New status ID.
    #[serde(default)]
    pub status_id: Option<u64>,

    /// New assignee user ID.
    #[serde(default)]
    pub assigned_to_id: Option<u64>,

    /// Comment to add to the task.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Parameters for `log_time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogTimeParams {
    /// The ID of the task (uses current task if not specified).
    #[serde(default)]
    pub issue_id: Option<u64>,

    /// Number of hours spent (required).
    #[serde(default)]
    pub hours: Option<f64>,

    /// Time entry activity ID (required; use list_activities to see options).
    #[serde(default)]
    pub activity_id: Option<u64>,

    /// Comments about the work done.
    #[serde(default)]
    pub comments: Option<String>,

    /// Date the time was spent (YYYY-MM-DD, defaults to today).
    #[serde(default)]
    pub spent_on: Option<String>,
}

/// Parameters for `list_tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListTasksParams {
    /// Filter by project ID or identifier (uses current project if not
    /// specified, otherwise all projects).
    #[serde(default)]
    pub project_id: Option<IdOrKey>,

    /// Filter by assigned user ID (use "me" for the current user).
    #[serde(default)]
    pub assigned_to_id: Option<IdOrKey>,

    /// Filter by status ID ("open", "closed", "*" for all).
    #[serde(default)]
    pub status_id: Option<IdOrKey>,

    /// Maximum number of tasks to return (default: 25).
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Parameters for `get_time_entries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeEntriesParams {
    /// The ID of the task (uses current task if not specified).
    #[serde(default)]
    pub issue_id: Option<u64>,
}

/// Parameters for `check_my_issues`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckMyIssuesParams {
    /// Filter by status ID ("open", "closed", "*" for all). When omitted,
    /// the available statuses are listed instead.
    #[serde(default)]
    pub status_id: Option<IdOrKey>,

    /// Maximum number of tasks to return (default: 25).
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Parameters for `set_current_project`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SetCurrentProjectParams {
    /// Project ID or identifier to set as current (must be from the
    /// list_projects results).
    pub project_id: IdOrKey,
}

/// Parameters for `set_current_task`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SetCurrentTaskParams {
    /// Task ID to set as current.
    pub issue_id: u64,
}

// ============================================================================
// Tool responses
// ============================================================================

/// A task that was just created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CreatedTask {
    /// Task id.
    pub id: u64,
    /// Title.
    pub subject: String,
    /// Initial status name.
    pub status: String,
    /// Browser link.
    pub url: String,
}

/// A task that was just updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdatedTask {
    /// Task id.
    pub id: u64,
    /// Browser link.
    pub url: String,
}

/// A time entry that was just logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoggedTime {
    /// Task the time was logged against.
    pub issue_id: u64,
    /// Hours recorded by the tracker.
    pub hours: f64,
    /// Activity name.
    pub activity: String,
    /// Comment, if any.
    pub comments: Option<String>,
}

/// One line of a task listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TaskSummary {
    /// Task id.
    pub id: u64,
    /// Title.
    pub subject: String,
    /// Status name.
    pub status: String,
}

impl From<Issue> for TaskSummary {
    fn from(issue: Issue) -> Self {
        Self {
            id: issue.id,
            subject: issue.subject,
            status: issue.status.name,
        }
    }
}

/// Result of `list_tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TaskList {
    /// Project filter that was applied, as given.
    pub project: Option<String>,
    /// Number of tasks matching the filters.
    pub total_count: u64,
    /// Tasks actually returned.
    pub tasks: Vec<TaskSummary>,
}

/// Result of `check_my_issues` when a status filter was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UserTaskList {
    /// Login of the current user.
    pub login: String,
    /// Number of tasks matching the filters.
    pub total_count: u64,
    /// Tasks actually returned.
    pub tasks: Vec<TaskSummary>,
}

/// A project as shown to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectSummary {
    /// Numeric id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Slug.
    pub identifier: String,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            identifier: project.identifier,
        }
    }
}

/// Result of `list_projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectCatalog {
    /// Total reported by the tracker.
    pub total_count: u64,
    /// Every project fetched.
    pub projects: Vec<ProjectSummary>,
}

/// A task as shown in context reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TaskRef {
    /// Task id.
    pub id: u64,
    /// Title.
    pub subject: String,
}

impl From<Issue> for TaskRef {
    fn from(issue: Issue) -> Self {
        Self {
            id: issue.id,
            subject: issue.subject,
        }
    }
}

/// Result of `get_context`, with live names for each set slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContextReport {
    /// Current project, if set.
    pub project: Option<ProjectSummary>,
    /// Current task, if set.
    pub task: Option<TaskRef>,
}

/// One entry inside a [`IssueTimeGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeEntryLine {
    /// Hours spent.
    pub hours: f64,
    /// Activity name.
    pub activity: String,
    /// Comment, if any.
    pub comments: Option<String>,
}

/// Time logged against one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IssueTimeGroup {
    /// Task id; `None` collects entries logged against a project only.
    pub issue_id: Option<u64>,
    /// Sum of `entries[].hours`.
    pub hours: f64,
    /// Entries in the order the tracker returned them.
    pub entries: Vec<TimeEntryLine>,
}

/// Result of `get_today_time_entries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DailyTimeReport {
    /// Day covered.
    pub date: String,
    /// One group per task, by ascending task id.
    pub groups: Vec<IssueTimeGroup>,
    /// Sum over all groups.
    pub total_hours: f64,
}

impl DailyTimeReport {
    /// Group `entries` by task and compute per-task and overall sums.
    #[must_use]
    pub fn from_entries(date: NaiveDate, entries: Vec<TimeEntry>) -> Self {
        let mut groups: BTreeMap<Option<u64>, IssueTimeGroup> = BTreeMap::new();
        let mut total_hours = 0.0;

        for entry in entries {
            let issue_id = entry.issue.map(|issue| issue.id);
            total_hours += entry.hours;

            let group = groups.entry(issue_id).or_insert_with(|| IssueTimeGroup {
                issue_id,
                hours: 0.0,
                entries: Vec::new(),
            });
            group.hours += entry.hours;
            group.entries.push(TimeEntryLine {
                hours: entry.hours,
                activity: entry.activity.name,
                comments: entry.comments.filter(|c| !c.is_empty()),
            });
        }

        Self {
            date: date.format("%Y-%m-%d").to_string(),
            groups: groups.into_values().collect(),
            total_hours,
        }
    }

    /// Whether nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Structured result of a successful tool invocation.
///
/// Rendering to text is implemented in [`crate::render`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// `create_task`.
    TaskCreated(CreatedTask),
    /// Verbatim tracker payload (`get_task`, `get_time_entries`,
    /// `get_current_user`).
    Echo(Value),
    /// `update_task`.
    TaskUpdated(UpdatedTask),
    /// `log_time`.
    TimeLogged(LoggedTime),
    /// `list_tasks`.
    Tasks(TaskList),
    /// `get_today_time_entries`.
    DailyTime(DailyTimeReport),
    /// `list_activities`.
    Activities(Vec<Activity>),
    /// `list_issue_statuses`.
    Statuses(Vec<IssueStatus>),
    /// `check_my_issues` without a status filter: pick one of these.
    StatusPrompt(Vec<IssueStatus>),
    /// `check_my_issues` with a status filter.
    MyTasks(UserTaskList),
    /// `list_projects`.
    Projects(ProjectCatalog),
    /// `set_current_project`.
    ProjectSet(ProjectSummary),
    /// `set_current_task`.
    TaskSet(TaskRef),
    /// `get_current_project`; `None` when unset.
    CurrentProject(Option<ProjectSummary>),
    /// `get_current_task`; `None` when unset.
    CurrentTask(Option<TaskRef>),
    /// `get_context`.
    Context(ContextReport),
    /// `clear_context`.
    ContextCleared,
}
