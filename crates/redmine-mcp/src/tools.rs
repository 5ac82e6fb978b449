//! MCP tool implementations.
//!
//! [`Tools`] is the operation dispatcher: for each operation it resolves
//! effective ids from the arguments and the shared [`Context`], runs local
//! validation, performs the remote calls in order and returns a structured
//! result. Local precondition failures never reach the tracker.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::models::{
    CheckMyIssuesParams, ContextReport, CreateTaskParams, CreatedTask, DEFAULT_TASK_LIMIT,
    DailyTimeReport, GetTaskParams, IdOrKey, ListTasksParams, LogTimeParams, LoggedTime,
    ProjectCatalog, ProjectSummary, Response, SetCurrentProjectParams, SetCurrentTaskParams,
    TaskList, TaskRef, TimeEntriesParams, UpdateTaskParams, UpdatedTask, UserTaskList,
};
use crate::operation::Operation;
use chrono::{Local, NaiveDate};
use redmine::domain::{
    AssigneeFilter, IssueQuery, IssueStatus, IssueUpdate, NewIssue, NewTimeEntry, ProjectRef,
    TimeEntryQuery,
};
use redmine::{RedmineApi, list_all_projects};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

const SET_PROJECT: &str = "set_current_project";
const SET_TASK: &str = "set_current_task";

/// Tool implementations for the redmine MCP server.
pub struct Tools {
    api: Arc<dyn RedmineApi>,
    context: Arc<Mutex<Context>>,
    base_url: String,
}

impl Tools {
    /// Create a dispatcher over `api`, sharing `context`.
    ///
    /// `base_url` is only used to build browser links in results.
    pub fn new(
        api: Arc<dyn RedmineApi>,
        context: Arc<Mutex<Context>>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api,
            context,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &Arc<Mutex<Context>> {
        &self.context
    }

    fn task_url(&self, id: u64) -> String {
        format!("{}/issues/{id}", self.base_url)
    }

    /// Run one operation to completion.
    ///
    /// # Errors
    ///
    /// Returns whatever the operation's own method returns.
    pub async fn execute(&self, operation: Operation) -> Result<Response> {
        let response = match operation {
            Operation::CreateTask(params) => Response::TaskCreated(self.create_task(params).await?),
            Operation::GetTask(params) => Response::Echo(self.get_task(params).await?),
            Operation::UpdateTask(params) => Response::TaskUpdated(self.update_task(params).await?),
            Operation::LogTime(params) => Response::TimeLogged(self.log_time(params).await?),
            Operation::ListTasks(params) => Response::Tasks(self.list_tasks(params).await?),
            Operation::GetTimeEntries(params) => {
                Response::Echo(self.get_time_entries(params).await?)
            }
            Operation::GetTodayTimeEntries => {
                Response::DailyTime(self.get_today_time_entries().await?)
            }
            Operation::ListActivities => {
                Response::Activities(self.api.list_time_entry_activities().await?)
            }
            Operation::ListIssueStatuses => {
                Response::Statuses(self.api.list_issue_statuses().await?)
            }
            Operation::CheckMyIssues(params) => match self.check_my_issues(params).await? {
                MyIssues::Tasks(tasks) => Response::MyTasks(tasks),
                MyIssues::ChooseStatus(statuses) => Response::StatusPrompt(statuses),
            },
            Operation::ListProjects => Response::Projects(self.list_projects().await?),
            Operation::GetCurrentUser => Response::Echo(self.get_current_user().await?),
            Operation::SetCurrentProject(params) => {
                Response::ProjectSet(self.set_current_project(params).await?)
            }
            Operation::GetCurrentProject => {
                Response::CurrentProject(self.get_current_project().await?)
            }
            Operation::SetCurrentTask(params) => {
                Response::TaskSet(self.set_current_task(params).await?)
            }
            Operation::GetCurrentTask => Response::CurrentTask(self.get_current_task().await?),
            Operation::GetContext => Response::Context(self.get_context().await?),
            Operation::ClearContext => {
                self.clear_context().await;
                Response::ContextCleared
            }
        };
        Ok(response)
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    /// Create a task, assigning it to the current user unless told otherwise.
    ///
    /// # Errors
    ///
    /// Returns `MissingContext` when no project is given or stored, and
    /// `MissingRequiredField` for a blank subject; both before any remote
    /// call.
    pub async fn create_task(&self, params: CreateTaskParams) -> Result<CreatedTask> {
        let context = self.context.lock().await;
        let project = resolve_project(params.project_id, &context)?;
        if params.subject.trim().is_empty() {
            return Err(Error::MissingRequiredField {
                field: "subject",
                hint: "Provide a short title for the task.",
            });
        }

        let assigned_to_id = match params.assigned_to_id {
            Some(id) => id,
            None => self.api.current_user().await?.id,
        };

        let issue = NewIssue {
            description: params.description,
            tracker_id: params.tracker_id,
            status_id: params.status_id,
            priority_id: params.priority_id,
            assigned_to_id: Some(assigned_to_id),
            parent_issue_id: params.parent_issue_id,
            estimated_hours: params.estimated_hours,
            ..NewIssue::new(project, params.subject)
        };
        let created = self.api.create_issue(&issue).await?;
        info!(id = created.id, "Created task");

        Ok(CreatedTask {
            id: created.id,
            url: self.task_url(created.id),
            subject: created.subject,
            status: created.status.name,
        })
    }

    /// Fetch a task and echo it verbatim.
    ///
    /// # Errors
    ///
    /// Returns `MissingContext` when no task is given or stored.
    pub async fn get_task(&self, params: GetTaskParams) -> Result<Value> {
        let context = self.context.lock().await;
        let id = resolve_task(params.issue_id, &context)?;
        let include = params.include.unwrap_or_default();

        Ok(self.api.fetch_issue(id, &include).await?)
    }

    /// Change only the supplied fields of a task.
    ///
    /// # Errors
    ///
    /// Returns `MissingContext` when no task is given or stored, and
    /// `InvalidArguments` when nothing would change.
    pub async fn update_task(&self, params: UpdateTaskParams) -> Result<UpdatedTask> {
        let context = self.context.lock().await;
        let id = resolve_task(params.issue_id, &context)?;

        let update = IssueUpdate {
            subject: params.subject,
            description: params.description,
            status_id: params.status_id,
            assigned_to_id: params.assigned_to_id,
            notes: params.notes,
        };
        if update.is_empty() {
            return Err(Error::InvalidArguments {
                operation: "update_task".to_string(),
                reason: "no fields to update".to_string(),
            });
        }

        self.api.update_issue(id, &update).await?;
        info!(id, "Updated task");

        Ok(UpdatedTask {
            id,
            url: self.task_url(id),
        })
    }

    /// Log time against a task.
    ///
    /// # Errors
    ///
    /// Returns `MissingContext`, `MissingRequiredField` (hours, activity) or
    /// `InvalidArguments` (non-positive hours, malformed date) before any
    /// remote call.
    pub async fn log_time(&self, params: LogTimeParams) -> Result<LoggedTime> {
        let context = self.context.lock().await;
        let issue_id = resolve_task(params.issue_id, &context)?;

        let Some(hours) = params.hours else {
            return Err(Error::MissingRequiredField {
                field: "hours",
                hint: "Provide the number of hours spent.",
            });
        };
        let Some(activity_id) = params.activity_id else {
            return Err(Error::MissingRequiredField {
                field: "activity_id",
                hint: "Use list_activities to see available activity options and their IDs.",
            });
        };
        if !hours.is_finite() || hours <= 0.0 {
            return Err(Error::InvalidArguments {
                operation: "log_time".to_string(),
                reason: format!("hours must be a positive number, got {hours}"),
            });
        }
        let spent_on = params.spent_on.as_deref().map(parse_date).transpose()?;

        let entry = NewTimeEntry {
            issue_id,
            hours,
            activity_id,
            spent_on,
            comments: params.comments,
        };
        let logged = self.api.create_time_entry(&entry).await?;
        info!(issue_id, hours = logged.hours, "Logged time");

        Ok(LoggedTime {
            issue_id,
            hours: logged.hours,
            activity: logged.activity.name,
            comments: logged.comments.filter(|c| !c.is_empty()),
        })
    }

    /// List tasks, scoped to the current project when one is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote listing fails.
    pub async fn list_tasks(&self, params: ListTasksParams) -> Result<TaskList> {
        let context = self.context.lock().await;
        let project = params
            .project_id
            .map(IdOrKey::into_project_ref)
            .or_else(|| context.project().map(ProjectRef::Id));

        let query = IssueQuery {
            project_id: project.clone(),
            assigned_to_id: params.assigned_to_id.map(IdOrKey::into_assignee),
            status_id: params.status_id.map(IdOrKey::into_status_filter),
            limit: Some(params.limit.unwrap_or(DEFAULT_TASK_LIMIT)),
            offset: None,
        };
        let list = self.api.list_issues(&query).await?;

        Ok(TaskList {
            project: project.map(|p| p.to_string()),
            total_count: list.total_count,
            tasks: list.issues.into_iter().map(Into::into).collect(),
        })
    }

    // ========================================================================
    // Time entries
    // ========================================================================

    /// Time entries logged against one task, echoed verbatim with the
    /// tracker's paging fields.
    ///
    /// # Errors
    ///
    /// Returns `MissingContext` when no task is given or stored.
    pub async fn get_time_entries(&self, params: TimeEntriesParams) -> Result<Value> {
        let context = self.context.lock().await;
        let issue_id = resolve_task(params.issue_id, &context)?;

        Ok(self
            .api
            .fetch_time_entries(&TimeEntryQuery::for_issue(issue_id))
            .await?)
    }

    /// The current user's entries for today, grouped by task.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote listing fails.
    pub async fn get_today_time_entries(&self) -> Result<DailyTimeReport> {
        let today = Local::now().date_naive();
        let list = self
            .api
            .list_time_entries(&TimeEntryQuery::mine_on(today))
            .await?;
        Ok(DailyTimeReport::from_entries(today, list.time_entries))
    }

    // ========================================================================
    // Catalogs
    // ========================================================================

    /// Tasks assigned to the current user.
    ///
    /// Without a status filter no tasks are listed; the status catalog is
    /// returned so the caller can pick one.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote call fails.
    pub async fn check_my_issues(&self, params: CheckMyIssuesParams) -> Result<MyIssues> {
        let user = self.api.current_user().await?;

        let Some(status) = params.status_id else {
            let statuses = self.api.list_issue_statuses().await?;
            return Ok(MyIssues::ChooseStatus(statuses));
        };

        let query = IssueQuery {
            assigned_to_id: Some(AssigneeFilter::Id(user.id)),
            status_id: Some(status.into_status_filter()),
            limit: Some(params.limit.unwrap_or(DEFAULT_TASK_LIMIT)),
            ..IssueQuery::default()
        };
        let list = self.api.list_issues(&query).await?;

        Ok(MyIssues::Tasks(UserTaskList {
            login: user.login,
            total_count: list.total_count,
            tasks: list.issues.into_iter().map(Into::into).collect(),
        }))
    }

    /// Every project visible to the API key, across all pages.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fetch fails.
    pub async fn list_projects(&self) -> Result<ProjectCatalog> {
        let list = list_all_projects(self.api.as_ref()).await?;
        Ok(ProjectCatalog {
            total_count: list.total_count,
            projects: list.projects.into_iter().map(Into::into).collect(),
        })
    }

    /// The authenticated user, echoed verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    pub async fn get_current_user(&self) -> Result<Value> {
        Ok(self.api.fetch_current_user().await?)
    }

    // ========================================================================
    // Context
    // ========================================================================

    /// Resolve a project by id or slug and store its numeric id.
    ///
    /// # Errors
    ///
    /// Returns `RemoteNotFound` if the tracker does not know the project; the
    /// stored project is left unchanged.
    pub async fn set_current_project(
        &self,
        params: SetCurrentProjectParams,
    ) -> Result<ProjectSummary> {
        let mut context = self.context.lock().await;
        let reference = params.project_id.into_project_ref();

        let project = self.api.get_project(&reference).await.map_err(not_found(
            format!("Project '{reference}'"),
            "Call list_projects first to see available projects.",
        ))?;
        context.set_project(project.id);
        info!(id = project.id, identifier = %project.identifier, "Current project set");

        Ok(project.into())
    }

    /// The stored project with live details, or `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote lookup fails.
    pub async fn get_current_project(&self) -> Result<Option<ProjectSummary>> {
        let context = self.context.lock().await;
        let Some(id) = context.project() else {
            return Ok(None);
        };
        let project = self.api.get_project(&ProjectRef::Id(id)).await?;
        Ok(Some(project.into()))
    }

    /// Confirm a task exists, then store it.
    ///
    /// # Errors
    ///
    /// Returns `RemoteNotFound` if the tracker does not know the task; the
    /// stored task is left unchanged.
    pub async fn set_current_task(&self, params: SetCurrentTaskParams) -> Result<TaskRef> {
        let mut context = self.context.lock().await;
        let id = params.issue_id;

        let issue = self.api.get_issue(id, &[]).await.map_err(not_found(
            format!("Task #{id}"),
            "Use list_tasks to find an existing task.",
        ))?;
        context.set_task(issue.id);
        info!(id = issue.id, "Current task set");

        Ok(issue.into())
    }

    /// The stored task with live details, or `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote lookup fails.
    pub async fn get_current_task(&self) -> Result<Option<TaskRef>> {
        let context = self.context.lock().await;
        let Some(id) = context.task() else {
            return Ok(None);
        };
        let issue = self.api.get_issue(id, &[]).await?;
        Ok(Some(issue.into()))
    }

    /// Both context slots, with live names for each one that is set.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote lookup fails.
    pub async fn get_context(&self) -> Result<ContextReport> {
        let context = self.context.lock().await;
        let snapshot = context.snapshot();

        let project = match snapshot.project {
            Some(id) => Some(self.api.get_project(&ProjectRef::Id(id)).await?.into()),
            None => None,
        };
        let task = match snapshot.task {
            Some(id) => Some(self.api.get_issue(id, &[]).await?.into()),
            None => None,
        };

        Ok(ContextReport { project, task })
    }

    /// Reset both context slots.
    pub async fn clear_context(&self) {
        self.context.lock().await.clear();
        info!("Context cleared");
    }
}

/// Outcome of [`Tools::check_my_issues`].
#[derive(Debug, Clone, PartialEq)]
pub enum MyIssues {
    /// Tasks matching the requested status.
    Tasks(UserTaskList),
    /// No status was given; these are the choices.
    ChooseStatus(Vec<IssueStatus>),
}

fn resolve_project(explicit: Option<IdOrKey>, context: &Context) -> Result<ProjectRef> {
    explicit
        .map(IdOrKey::into_project_ref)
        .or_else(|| context.project().map(ProjectRef::Id))
        .ok_or(Error::MissingContext {
            field: "project_id",
            setter: SET_PROJECT,
        })
}

fn resolve_task(explicit: Option<u64>, context: &Context) -> Result<u64> {
    explicit.or_else(|| context.task()).ok_or(Error::MissingContext {
        field: "issue_id",
        setter: SET_TASK,
    })
}

/// Map a remote "not found" to `RemoteNotFound`; pass anything else through.
fn not_found(what: String, hint: &'static str) -> impl FnOnce(redmine::Error) -> Error {
    move |source| {
        if source.is_not_found() {
            Error::RemoteNotFound { what, hint, source }
        } else {
            Error::Remote(source)
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| Error::InvalidArguments {
        operation: "log_time".to_string(),
        reason: format!("spent_on must be YYYY-MM-DD: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use redmine::fake::{ApiCall, FakeRedmine};

    fn tools(fake: FakeRedmine) -> (Tools, Arc<FakeRedmine>) {
        let fake = Arc::new(fake);
        let tools = Tools::new(
            fake.clone(),
            Arc::new(Mutex::new(Context::new())),
            "https://redmine.example.com/",
        );
        (tools, fake)
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let mut context = Context::new();
        context.set_project(1);
        context.set_task(2);

        assert_eq!(
            resolve_project(Some(IdOrKey::Key("web".to_string())), &context).unwrap(),
            ProjectRef::Identifier("web".to_string())
        );
        assert_eq!(resolve_project(None, &context).unwrap(), ProjectRef::Id(1));
        assert_eq!(resolve_task(Some(7), &context).unwrap(), 7);
        assert_eq!(resolve_task(None, &context).unwrap(), 2);
    }

    #[test]
    fn test_resolve_missing_context() {
        match resolve_task(None, &Context::new()).unwrap_err() {
            Error::MissingContext { field, setter } => {
                assert_eq!(field, "issue_id");
                assert_eq!(setter, "set_current_task");
            }
            e => panic!("Expected MissingContext error, got: {e:?}"),
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-05-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
        assert!(matches!(
            parse_date("02/05/2024"),
            Err(Error::InvalidArguments { .. })
        ));
    }

    #[tokio::test]
    async fn test_task_url_uses_base_without_trailing_slash() {
        let (tools, _) = tools(FakeRedmine::new().with_project(1, "Website", "web"));
        let created = tools
            .create_task(CreateTaskParams {
                project_id: Some(IdOrKey::Id(1)),
                subject: "Fix login".to_string(),
                ..CreateTaskParams::default()
            })
            .await
            .unwrap();
        assert_eq!(
            created.url,
            format!("https://redmine.example.com/issues/{}", created.id)
        );
    }

    #[tokio::test]
    async fn test_explicit_assignee_skips_user_lookup() {
        let (tools, fake) = tools(FakeRedmine::new().with_project(1, "Website", "web"));
        tools
            .create_task(CreateTaskParams {
                project_id: Some(IdOrKey::Id(1)),
                subject: "Fix login".to_string(),
                assigned_to_id: Some(5),
                ..CreateTaskParams::default()
            })
            .await
            .unwrap();
        assert_eq!(fake.count(|c| *c == ApiCall::CurrentUser), 0);
    }

    #[tokio::test]
    async fn test_blank_subject_is_local() {
        let (tools, fake) = tools(FakeRedmine::new());
        let err = tools
            .create_task(CreateTaskParams {
                project_id: Some(IdOrKey::Id(1)),
                subject: "   ".to_string(),
                ..CreateTaskParams::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_local());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_locally() {
        let (tools, fake) = tools(FakeRedmine::new());
        let err = tools
            .update_task(UpdateTaskParams {
                issue_id: Some(1),
                ..UpdateTaskParams::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { .. }));
        assert!(fake.calls().is_empty());
    }
}
