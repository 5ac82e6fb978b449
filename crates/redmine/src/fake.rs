//! In-memory stand-in for a Redmine instance.
//!
//! [`FakeRedmine`] implements [`RedmineApi`] over plain collections and
//! records every call it receives, so tests can assert both results and the
//! exact remote traffic an operation produced (including "no call at all").
//!
//! # Availability
//!
//! Compiled for this crate's own tests and when the `test-util` feature is
//! enabled:
//!
//! ```toml
//! [dev-dependencies]
//! redmine = { path = "...", features = ["test-util"] }
//! ```
//!
//! # Behavior
//!
//! - Lookups of missing issues or projects return `Error::NotFound`
//! - Creating issues or time entries against unknown projects, issues or
//!   activities returns `Error::Api` with status 422 and a Redmine-style
//!   `{"errors": [...]}` body
//! - [`FakeRedmine::fail`] forces a named endpoint to fail with a given
//!   status and body

use crate::api::RedmineApi;
use crate::domain::{
    Activity, AssigneeFilter, Issue, IssueList, IssueQuery, IssueRef, IssueStatus, IssueUpdate,
    NamedRef, NewIssue, NewTimeEntry, Project, ProjectPage, ProjectRef, TimeEntry, TimeEntryList,
    TimeEntryQuery, User,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Page size the fake applies when a listing omits `limit`.
const DEFAULT_PAGE_SIZE: u32 = 25;

/// One recorded call against the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    /// `create_issue` with the serialized request payload.
    CreateIssue(Value),
    /// `get_issue` with the requested includes.
    GetIssue {
        /// Issue id.
        id: u64,
        /// Requested auxiliary data.
        include: Vec<String>,
    },
    /// `update_issue` with the serialized request payload.
    UpdateIssue {
        /// Issue id.
        id: u64,
        /// Exactly what would have been sent.
        payload: Value,
    },
    /// `create_time_entry` with the serialized request payload.
    CreateTimeEntry(Value),
    /// `list_time_entries`.
    ListTimeEntries(TimeEntryQuery),
    /// `list_issues`.
    ListIssues(IssueQuery),
    /// `list_projects_page`.
    ListProjectsPage {
        /// Requested page size.
        limit: u32,
        /// Requested offset.
        offset: u32,
    },
    /// `get_project`.
    GetProject(ProjectRef),
    /// `current_user`.
    CurrentUser,
    /// `list_time_entry_activities`.
    ListActivities,
    /// `list_issue_statuses`.
    ListIssueStatuses,
}

impl ApiCall {
    /// Endpoint name, as accepted by [`FakeRedmine::fail`].
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::CreateIssue(_) => "create_issue",
            Self::GetIssue { .. } => "get_issue",
            Self::UpdateIssue { .. } => "update_issue",
            Self::CreateTimeEntry(_) => "create_time_entry",
            Self::ListTimeEntries(_) => "list_time_entries",
            Self::ListIssues(_) => "list_issues",
            Self::ListProjectsPage { .. } => "list_projects_page",
            Self::GetProject(_) => "get_project",
            Self::CurrentUser => "current_user",
            Self::ListActivities => "list_time_entry_activities",
            Self::ListIssueStatuses => "list_issue_statuses",
        }
    }
}

#[derive(Debug)]
struct State {
    user: User,
    projects: Vec<Project>,
    reported_project_total: Option<u64>,
    page_cap: u32,
    issues: BTreeMap<u64, Issue>,
    issue_bodies: BTreeMap<u64, Value>,
    time_entries: Vec<TimeEntry>,
    activities: Vec<Activity>,
    statuses: Vec<IssueStatus>,
    next_issue_id: u64,
    next_time_entry_id: u64,
    failures: HashMap<&'static str, (u16, Value)>,
    calls: Vec<ApiCall>,
}

/// In-memory Redmine double that records its traffic.
///
/// Seeded with one user (`id` 1, login `jdoe`), two activities
/// (Development, the default, and Support) and three statuses (New, the
/// default; In Progress; Closed).
#[derive(Debug)]
pub struct FakeRedmine {
    state: Mutex<State>,
}

impl FakeRedmine {
    /// Create a fake with the default seed data.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                user: User {
                    id: 1,
                    login: "jdoe".to_string(),
                    extra: Map::new(),
                },
                projects: Vec::new(),
                reported_project_total: None,
                page_cap: crate::api::MAX_PAGE_SIZE,
                issues: BTreeMap::new(),
                issue_bodies: BTreeMap::new(),
                time_entries: Vec::new(),
                activities: vec![
                    Activity {
                        id: 9,
                        name: "Development".to_string(),
                        is_default: true,
                    },
                    Activity {
                        id: 10,
                        name: "Support".to_string(),
                        is_default: false,
                    },
                ],
                statuses: vec![
                    IssueStatus {
                        id: 1,
                        name: "New".to_string(),
                        is_default: true,
                        is_closed: false,
                    },
                    IssueStatus {
                        id: 2,
                        name: "In Progress".to_string(),
                        is_default: false,
                        is_closed: false,
                    },
                    IssueStatus {
                        id: 5,
                        name: "Closed".to_string(),
                        is_default: false,
                        is_closed: true,
                    },
                ],
                next_issue_id: 1000,
                next_time_entry_id: 1,
                failures: HashMap::new(),
                calls: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a project.
    #[must_use]
    pub fn with_project(self, id: u64, name: &str, identifier: &str) -> Self {
        self.state().projects.push(Project {
            id,
            name: name.to_string(),
            identifier: identifier.to_string(),
            extra: Map::new(),
        });
        self
    }

    /// Add `count` projects with ids `1..=count` and slugs `project-N`.
    #[must_use]
    pub fn with_generated_projects(self, count: u64) -> Self {
        {
            let mut state = self.state();
            for id in 1..=count {
                state.projects.push(Project {
                    id,
                    name: format!("Project {id}"),
                    identifier: format!("project-{id}"),
                    extra: Map::new(),
                });
            }
        }
        self
    }

    /// Report `total` as the project count regardless of what is stored.
    #[must_use]
    pub fn with_reported_project_total(self, total: u64) -> Self {
        self.state().reported_project_total = Some(total);
        self
    }

    /// Cap project pages below the requested size, like a server configured
    /// with a smaller maximum.
    #[must_use]
    pub fn with_page_cap(self, cap: u32) -> Self {
        self.state().page_cap = cap;
        self
    }

    /// Add an issue in status New, assigned to nobody.
    #[must_use]
    pub fn with_issue(self, id: u64, project_id: u64, subject: &str) -> Self {
        {
            let mut state = self.state();
            let project = project_ref_for(&state.projects, project_id);
            let status = default_status(&state.statuses);
            state.issues.insert(
                id,
                Issue {
                    id,
                    project: Some(project),
                    tracker: None,
                    status,
                    priority: None,
                    subject: subject.to_string(),
                    description: None,
                    assigned_to: None,
                    estimated_hours: None,
                    parent: None,
                    extra: Map::new(),
                },
            );
        }
        self
    }

    /// Add an issue from a raw tracker payload, served back verbatim by
    /// [`RedmineApi::fetch_issue`] until the issue is updated.
    ///
    /// # Panics
    ///
    /// Panics if `body` is not a valid issue.
    #[must_use]
    pub fn with_issue_body(self, body: Value) -> Self {
        let issue: Issue = match serde_json::from_value(body.clone()) {
            Ok(issue) => issue,
            Err(e) => panic!("invalid issue body: {e}"),
        };
        {
            let mut state = self.state();
            state.issue_bodies.insert(issue.id, body);
            state.issues.insert(issue.id, issue);
        }
        self
    }

    /// Assign an existing issue to a user and move it to a status.
    #[must_use]
    pub fn with_assignment(self, issue_id: u64, user_id: u64, status_id: u64) -> Self {
        {
            let mut state = self.state();
            let status = status_ref_for(&state.statuses, status_id);
            let user = NamedRef::new(user_id, format!("User {user_id}"));
            if let Some(issue) = state.issues.get_mut(&issue_id) {
                issue.assigned_to = Some(user);
                issue.status = status;
            }
        }
        self
    }

    /// Add a time entry by the seeded user.
    #[must_use]
    pub fn with_time_entry(
        self,
        issue_id: Option<u64>,
        hours: f64,
        activity_id: u64,
        spent_on: NaiveDate,
        comments: Option<&str>,
    ) -> Self {
        {
            let mut state = self.state();
            let id = state.next_time_entry_id;
            state.next_time_entry_id += 1;
            let activity = activity_ref_for(&state.activities, activity_id);
            let user = NamedRef::new(state.user.id, state.user.login.clone());
            state.time_entries.push(TimeEntry {
                id,
                issue: issue_id.map(|id| IssueRef { id }),
                user: Some(user),
                activity,
                hours,
                comments: comments.map(str::to_string),
                spent_on,
                extra: Map::new(),
            });
        }
        self
    }

    /// Force `endpoint` (see [`ApiCall::endpoint`]) to fail.
    ///
    /// A 404 status produces `Error::NotFound`; anything else `Error::Api`.
    #[must_use]
    pub fn fail(self, endpoint: &'static str, status: u16, body: Value) -> Self {
        self.state().failures.insert(endpoint, (status, body));
        self
    }

    /// Every call received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.state().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Current stored copy of an issue.
    #[must_use]
    pub fn issue(&self, id: u64) -> Option<Issue> {
        self.state().issues.get(&id).cloned()
    }

    /// Record `call` and return the configured failure for its endpoint.
    fn record(&self, call: ApiCall) -> Result<()> {
        let mut state = self.state();
        let endpoint = call.endpoint();
        let path = format!("fake://{endpoint}");
        state.calls.push(call);

        match state.failures.get(endpoint) {
            Some((404, body)) => Err(Error::NotFound {
                path,
                body: Some(body.clone()),
            }),
            Some((status, body)) => Err(Error::Api {
                status: *status,
                path,
                body: Some(body.clone()),
            }),
            None => Ok(()),
        }
    }
}

impl Default for FakeRedmine {
    fn default() -> Self {
        Self::new()
    }
}

fn unprocessable(path: &str, message: &str) -> Error {
    Error::Api {
        status: 422,
        path: path.to_string(),
        body: Some(json!({ "errors": [message] })),
    }
}

fn encode<T: Serialize>(path: &str, value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|source| Error::Decode {
        path: path.to_string(),
        source,
    })
}

fn project_ref_for(projects: &[Project], project_id: u64) -> NamedRef {
    projects.iter().find(|p| p.id == project_id).map_or_else(
        || NamedRef::new(project_id, format!("Project {project_id}")),
        |p| NamedRef::new(p.id, p.name.clone()),
    )
}

fn status_ref_for(statuses: &[IssueStatus], status_id: u64) -> NamedRef {
    statuses.iter().find(|s| s.id == status_id).map_or_else(
        || NamedRef::new(status_id, format!("Status {status_id}")),
        |s| NamedRef::new(s.id, s.name.clone()),
    )
}

fn default_status(statuses: &[IssueStatus]) -> NamedRef {
    statuses
        .iter()
        .find(|s| s.is_default)
        .or_else(|| statuses.first())
        .map_or_else(|| NamedRef::new(1, "New"), |s| NamedRef::new(s.id, s.name.clone()))
}

fn activity_ref_for(activities: &[Activity], activity_id: u64) -> NamedRef {
    activities.iter().find(|a| a.id == activity_id).map_or_else(
        || NamedRef::new(activity_id, format!("Activity {activity_id}")),
        |a| NamedRef::new(a.id, a.name.clone()),
    )
}

fn matches_user(filter: &AssigneeFilter, user_id: u64, me: u64) -> bool {
    match filter {
        AssigneeFilter::Id(id) => *id == user_id,
        AssigneeFilter::Keyword(keyword) => keyword == "me" && user_id == me,
    }
}

fn matches_status(filter: &str, status_id: u64, statuses: &[IssueStatus]) -> bool {
    let closed = statuses
        .iter()
        .find(|s| s.id == status_id)
        .is_some_and(|s| s.is_closed);
    match filter {
        "*" => true,
        "open" => !closed,
        "closed" => closed,
        other => other.parse::<u64>().is_ok_and(|id| id == status_id),
    }
}

#[async_trait]
impl RedmineApi for FakeRedmine {
    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue> {
        self.record(ApiCall::CreateIssue(serde_json::to_value(issue).unwrap_or_default()))?;
        let mut state = self.state();

        let Some(project) = state
            .projects
            .iter()
            .find(|p| issue.project_id.matches(p))
            .map(|p| NamedRef::new(p.id, p.name.clone()))
        else {
            return Err(unprocessable("/issues.json", "Project is invalid"));
        };
        if issue.subject.trim().is_empty() {
            return Err(unprocessable("/issues.json", "Subject cannot be blank"));
        }

        let status = match issue.status_id {
            Some(id) => status_ref_for(&state.statuses, id),
            None => default_status(&state.statuses),
        };
        let assigned_to = issue.assigned_to_id.map(|id| {
            if id == state.user.id {
                NamedRef::new(id, state.user.login.clone())
            } else {
                NamedRef::new(id, format!("User {id}"))
            }
        });

        let id = state.next_issue_id;
        state.next_issue_id += 1;
        let created = Issue {
            id,
            project: Some(project),
            tracker: issue.tracker_id.map(|id| NamedRef::new(id, format!("Tracker {id}"))),
            status,
            priority: issue
                .priority_id
                .map(|id| NamedRef::new(id, format!("Priority {id}"))),
            subject: issue.subject.clone(),
            description: issue.description.clone(),
            assigned_to,
            estimated_hours: issue.estimated_hours,
            parent: issue.parent_issue_id.map(|id| IssueRef { id }),
            extra: Map::new(),
        };
        state.issues.insert(id, created.clone());
        Ok(created)
    }

    async fn fetch_issue(&self, id: u64, include: &[String]) -> Result<Value> {
        self.record(ApiCall::GetIssue {
            id,
            include: include.to_vec(),
        })?;
        let state = self.state();
        let path = format!("/issues/{id}.json");
        let mut body = match state.issue_bodies.get(&id) {
            Some(body) => body.clone(),
            None => {
                let issue = state.issues.get(&id).ok_or_else(|| Error::NotFound {
                    path: path.clone(),
                    body: None,
                })?;
                encode(&path, issue)?
            }
        };
        if let Some(object) = body.as_object_mut() {
            for extra in include {
                object.entry(extra.clone()).or_insert_with(|| json!([]));
            }
        }
        Ok(body)
    }

    async fn update_issue(&self, id: u64, update: &IssueUpdate) -> Result<()> {
        self.record(ApiCall::UpdateIssue {
            id,
            payload: serde_json::to_value(update).unwrap_or_default(),
        })?;
        let mut state = self.state();
        let status = update
            .status_id
            .map(|status_id| status_ref_for(&state.statuses, status_id));
        state.issue_bodies.remove(&id);
        let Some(issue) = state.issues.get_mut(&id) else {
            return Err(Error::NotFound {
                path: format!("/issues/{id}.json"),
                body: None,
            });
        };

        if let Some(subject) = &update.subject {
            issue.subject.clone_from(subject);
        }
        if let Some(description) = &update.description {
            issue.description = Some(description.clone());
        }
        if let Some(status) = status {
            issue.status = status;
        }
        if let Some(user_id) = update.assigned_to_id {
            issue.assigned_to = Some(NamedRef::new(user_id, format!("User {user_id}")));
        }
        if let Some(notes) = &update.notes {
            let journals = issue
                .extra
                .entry("journals".to_string())
                .or_insert_with(|| json!([]));
            if let Value::Array(items) = journals {
                items.push(json!({ "notes": notes }));
            }
        }
        Ok(())
    }

    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry> {
        self.record(ApiCall::CreateTimeEntry(
            serde_json::to_value(entry).unwrap_or_default(),
        ))?;
        let mut state = self.state();

        if !state.issues.contains_key(&entry.issue_id) {
            return Err(unprocessable("/time_entries.json", "Issue is invalid"));
        }
        let Some(activity) = state
            .activities
            .iter()
            .find(|a| a.id == entry.activity_id)
            .map(|a| NamedRef::new(a.id, a.name.clone()))
        else {
            return Err(unprocessable("/time_entries.json", "Activity is not included in the list"));
        };

        let id = state.next_time_entry_id;
        state.next_time_entry_id += 1;
        let created = TimeEntry {
            id,
            issue: Some(IssueRef { id: entry.issue_id }),
            user: Some(NamedRef::new(state.user.id, state.user.login.clone())),
            activity,
            hours: entry.hours,
            comments: entry.comments.clone(),
            spent_on: entry.spent_on.unwrap_or_else(|| Local::now().date_naive()),
            extra: Map::new(),
        };
        state.time_entries.push(created.clone());
        Ok(created)
    }

    async fn fetch_time_entries(&self, query: &TimeEntryQuery) -> Result<Value> {
        self.record(ApiCall::ListTimeEntries(query.clone()))?;
        let state = self.state();
        let me = state.user.id;

        let time_entries: Vec<TimeEntry> = state
            .time_entries
            .iter()
            .filter(|e| {
                query
                    .issue_id
                    .is_none_or(|id| e.issue.is_some_and(|issue| issue.id == id))
            })
            .filter(|e| query.spent_on.is_none_or(|date| e.spent_on == date))
            .filter(|e| {
                query.user_id.as_ref().is_none_or(|filter| {
                    e.user
                        .as_ref()
                        .is_some_and(|user| matches_user(filter, user.id, me))
                })
            })
            .cloned()
            .collect();

        let list = TimeEntryList {
            total_count: time_entries.len() as u64,
            limit: u64::from(DEFAULT_PAGE_SIZE),
            offset: 0,
            time_entries,
        };
        encode("/time_entries.json", &list)
    }

    async fn list_issues(&self, query: &IssueQuery) -> Result<IssueList> {
        self.record(ApiCall::ListIssues(query.clone()))?;
        let state = self.state();
        let me = state.user.id;

        let project_id = match &query.project_id {
            Some(project_ref) => match state.projects.iter().find(|p| project_ref.matches(p)) {
                Some(project) => Some(project.id),
                None => {
                    return Err(Error::NotFound {
                        path: "/issues.json".to_string(),
                        body: None,
                    });
                }
            },
            None => None,
        };
        let status_filter = query.status_id.as_deref().unwrap_or("open");

        let matching: Vec<&Issue> = state
            .issues
            .values()
            .filter(|i| {
                project_id.is_none_or(|id| i.project.as_ref().is_some_and(|p| p.id == id))
            })
            .filter(|i| {
                query.assigned_to_id.as_ref().is_none_or(|filter| {
                    i.assigned_to
                        .as_ref()
                        .is_some_and(|user| matches_user(filter, user.id, me))
                })
            })
            .filter(|i| matches_status(status_filter, i.status.id, &state.statuses))
            .collect();

        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(state.page_cap) as usize;
        let offset = query.offset.unwrap_or(0) as usize;

        Ok(IssueList {
            total_count: matching.len() as u64,
            offset: offset as u64,
            limit: limit as u64,
            issues: matching.into_iter().skip(offset).take(limit).cloned().collect(),
        })
    }

    async fn list_projects_page(&self, limit: u32, offset: u32) -> Result<ProjectPage> {
        self.record(ApiCall::ListProjectsPage { limit, offset })?;
        let state = self.state();
        let take = limit.min(state.page_cap) as usize;
        let projects: Vec<Project> = state
            .projects
            .iter()
            .skip(offset as usize)
            .take(take)
            .cloned()
            .collect();

        Ok(ProjectPage {
            projects,
            total_count: state
                .reported_project_total
                .unwrap_or(state.projects.len() as u64),
            offset: u64::from(offset),
            limit: take as u64,
        })
    }

    async fn get_project(&self, project: &ProjectRef) -> Result<Project> {
        self.record(ApiCall::GetProject(project.clone()))?;
        self.state()
            .projects
            .iter()
            .find(|p| project.matches(p))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                path: format!("/projects/{project}.json"),
                body: None,
            })
    }

    async fn fetch_current_user(&self) -> Result<Value> {
        self.record(ApiCall::CurrentUser)?;
        encode("/users/current.json", &self.state().user)
    }

    async fn list_time_entry_activities(&self) -> Result<Vec<Activity>> {
        self.record(ApiCall::ListActivities)?;
        Ok(self.state().activities.clone())
    }

    async fn list_issue_statuses(&self) -> Result<Vec<IssueStatus>> {
        self.record(ApiCall::ListIssueStatuses)?;
        Ok(self.state().statuses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let fake = FakeRedmine::new().with_project(1, "Website", "web");

        fake.current_user().await.unwrap();
        fake.get_project(&ProjectRef::parse("web")).await.unwrap();

        assert_eq!(
            fake.calls(),
            vec![
                ApiCall::CurrentUser,
                ApiCall::GetProject(ProjectRef::Identifier("web".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_issue_is_not_found() {
        let fake = FakeRedmine::new();
        let err = fake.get_issue(404, &[]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_issue_body_served_verbatim_until_updated() {
        let body = json!({
            "id": 7,
            "status": {"id": 1, "name": "New", "is_closed": false},
            "subject": "Raw",
            "description": null,
        });
        let fake = FakeRedmine::new().with_issue_body(body.clone());

        assert_eq!(fake.fetch_issue(7, &[]).await.unwrap(), body);
        assert_eq!(fake.get_issue(7, &[]).await.unwrap().subject, "Raw");

        fake.update_issue(
            7,
            &IssueUpdate {
                subject: Some("Edited".to_string()),
                ..IssueUpdate::default()
            },
        )
        .await
        .unwrap();
        let edited = fake.fetch_issue(7, &[]).await.unwrap();
        assert_eq!(edited["subject"], json!("Edited"));
    }

    #[tokio::test]
    async fn test_forced_failure() {
        let fake = FakeRedmine::new().fail("current_user", 401, json!({"errors": ["Unauthorized"]}));
        match fake.current_user().await {
            Err(Error::Api { status, body, .. }) => {
                assert_eq!(status, 401);
                assert_eq!(body, Some(json!({"errors": ["Unauthorized"]})));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
        assert_eq!(fake.count(|c| *c == ApiCall::CurrentUser), 1);
    }

    #[tokio::test]
    async fn test_list_issues_status_keywords() {
        let fake = FakeRedmine::new()
            .with_project(1, "Website", "web")
            .with_issue(1, 1, "Open one")
            .with_issue(2, 1, "Closed one")
            .with_assignment(2, 1, 5);

        let open = fake
            .list_issues(&IssueQuery {
                status_id: Some("open".to_string()),
                ..IssueQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(open.total_count, 1);

        let all = fake
            .list_issues(&IssueQuery {
                status_id: Some("*".to_string()),
                ..IssueQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(all.total_count, 2);

        let mine = fake
            .list_issues(&IssueQuery {
                assigned_to_id: Some(AssigneeFilter::Keyword("me".to_string())),
                status_id: Some("closed".to_string()),
                ..IssueQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.issues.len(), 1);
        assert_eq!(mine.issues[0].id, 2);
    }
}
