//! The closed set of operations the server can perform.
//!
//! Raw invocations (a tool name plus a loosely-typed JSON argument bag) are
//! decoded into an [`Operation`] at the boundary, so the dispatcher only ever
//! sees well-typed requests.

use crate::error::{Error, Result};
use crate::models::{
    CheckMyIssuesParams, CreateTaskParams, GetTaskParams, ListTasksParams, LogTimeParams,
    SetCurrentProjectParams, SetCurrentTaskParams, TimeEntriesParams, UpdateTaskParams,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Every tool name in the catalog, in catalog order.
pub const OPERATION_NAMES: [&str; 18] = [
    "create_task",
    "get_task",
    "update_task",
    "log_time",
    "list_tasks",
    "get_time_entries",
    "get_today_time_entries",
    "list_activities",
    "list_issue_statuses",
    "check_my_issues",
    "list_projects",
    "get_current_user",
    "set_current_project",
    "get_current_project",
    "set_current_task",
    "get_current_task",
    "get_context",
    "clear_context",
];

/// One typed tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create a new task.
    CreateTask(CreateTaskParams),
    /// Fetch one task verbatim.
    GetTask(GetTaskParams),
    /// Partially update a task and optionally add a note.
    UpdateTask(UpdateTaskParams),
    /// Log time against a task.
    LogTime(LogTimeParams),
    /// List tasks with filters.
    ListTasks(ListTasksParams),
    /// Time entries for one task.
    GetTimeEntries(TimeEntriesParams),
    /// The current user's time entries for today, grouped by task.
    GetTodayTimeEntries,
    /// Time entry activity catalog.
    ListActivities,
    /// Issue status catalog.
    ListIssueStatuses,
    /// Tasks assigned to the current user.
    CheckMyIssues(CheckMyIssuesParams),
    /// Every project, across all pages.
    ListProjects,
    /// The authenticated user.
    GetCurrentUser,
    /// Validate and store the current project.
    SetCurrentProject(SetCurrentProjectParams),
    /// Show the current project.
    GetCurrentProject,
    /// Validate and store the current task.
    SetCurrentTask(SetCurrentTaskParams),
    /// Show the current task.
    GetCurrentTask,
    /// Show both context slots.
    GetContext,
    /// Reset both context slots.
    ClearContext,
}

impl Operation {
    /// Decode a raw invocation.
    ///
    /// A missing argument bag is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownOperation` for names outside the catalog and
    /// `Error::InvalidArguments` when the bag does not fit the operation's
    /// parameter record.
    pub fn from_call(name: &str, arguments: Option<Map<String, Value>>) -> Result<Self> {
        let args = Value::Object(arguments.unwrap_or_default());

        let operation = match name {
            "create_task" => Self::CreateTask(decode(name, args)?),
            "get_task" => Self::GetTask(decode(name, args)?),
            "update_task" => Self::UpdateTask(decode(name, args)?),
            "log_time" => Self::LogTime(decode(name, args)?),
            "list_tasks" => Self::ListTasks(decode(name, args)?),
            "get_time_entries" => Self::GetTimeEntries(decode(name, args)?),
            "get_today_time_entries" => Self::GetTodayTimeEntries,
            "list_activities" => Self::ListActivities,
            "list_issue_statuses" => Self::ListIssueStatuses,
            "check_my_issues" => Self::CheckMyIssues(decode(name, args)?),
            "list_projects" => Self::ListProjects,
            "get_current_user" => Self::GetCurrentUser,
            "set_current_project" => Self::SetCurrentProject(decode(name, args)?),
            "get_current_project" => Self::GetCurrentProject,
            "set_current_task" => Self::SetCurrentTask(decode(name, args)?),
            "get_current_task" => Self::GetCurrentTask,
            "get_context" => Self::GetContext,
            "clear_context" => Self::ClearContext,
            other => return Err(Error::UnknownOperation(other.to_string())),
        };
        Ok(operation)
    }

    /// Tool name of this operation.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateTask(_) => "create_task",
            Self::GetTask(_) => "get_task",
            Self::UpdateTask(_) => "update_task",
            Self::LogTime(_) => "log_time",
            Self::ListTasks(_) => "list_tasks",
            Self::GetTimeEntries(_) => "get_time_entries",
            Self::GetTodayTimeEntries => "get_today_time_entries",
            Self::ListActivities => "list_activities",
            Self::ListIssueStatuses => "list_issue_statuses",
            Self::CheckMyIssues(_) => "check_my_issues",
            Self::ListProjects => "list_projects",
            Self::GetCurrentUser => "get_current_user",
            Self::SetCurrentProject(_) => "set_current_project",
            Self::GetCurrentProject => "get_current_project",
            Self::SetCurrentTask(_) => "set_current_task",
            Self::GetCurrentTask => "get_current_task",
            Self::GetContext => "get_context",
            Self::ClearContext => "clear_context",
        }
    }
}

fn decode<T: DeserializeOwned>(operation: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| Error::InvalidArguments {
        operation: operation.to_string(),
        reason: e.to_string(),
    })
}
