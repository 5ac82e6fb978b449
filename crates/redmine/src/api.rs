//! The remote API seam.
//!
//! [`RedmineApi`] lists every tracker endpoint the MCP server needs. The
//! trait is object-safe so callers can hold an `Arc<dyn RedmineApi>` and
//! swap the HTTP implementation for a fake in tests.

use crate::domain::{
    Activity, Issue, IssueList, IssueQuery, IssueStatus, IssueUpdate, NewIssue, NewTimeEntry,
    Project, ProjectList, ProjectPage, ProjectRef, TimeEntry, TimeEntryList, TimeEntryQuery, User,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Largest page the tracker will return for list endpoints.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Remote operations against a Redmine instance.
///
/// # Error Handling
///
/// Implementations report a missing entity as `Error::NotFound` and any other
/// rejection as `Error::Api` carrying the tracker's response body.
#[async_trait]
pub trait RedmineApi: Send + Sync {
    /// `POST /issues.json`.
    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue>;

    /// `GET /issues/{id}.json`, optionally with auxiliary data
    /// (`journals`, `relations`, `watchers`, ...).
    ///
    /// Returns the `issue` object exactly as the tracker sent it.
    async fn fetch_issue(&self, id: u64, include: &[String]) -> Result<Value>;

    /// [`fetch_issue`](Self::fetch_issue), decoded.
    async fn get_issue(&self, id: u64, include: &[String]) -> Result<Issue> {
        let body = self.fetch_issue(id, include).await?;
        decode(&format!("/issues/{id}.json"), body)
    }

    /// `PUT /issues/{id}.json` with only the fields present in `update`.
    async fn update_issue(&self, id: u64, update: &IssueUpdate) -> Result<()>;

    /// `POST /time_entries.json`.
    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry>;

    /// `GET /time_entries.json`, returning the whole response body
    /// (`time_entries` plus `total_count`, `offset` and `limit`).
    async fn fetch_time_entries(&self, query: &TimeEntryQuery) -> Result<Value>;

    /// [`fetch_time_entries`](Self::fetch_time_entries), decoded.
    async fn list_time_entries(&self, query: &TimeEntryQuery) -> Result<TimeEntryList> {
        let body = self.fetch_time_entries(query).await?;
        decode("/time_entries.json", body)
    }

    /// `GET /issues.json`.
    async fn list_issues(&self, query: &IssueQuery) -> Result<IssueList>;

    /// `GET /projects.json` for a single page.
    async fn list_projects_page(&self, limit: u32, offset: u32) -> Result<ProjectPage>;

    /// `GET /projects/{id}.json`, by numeric id or slug.
    async fn get_project(&self, project: &ProjectRef) -> Result<Project>;

    /// `GET /users/current.json`, returning the `user` object verbatim.
    async fn fetch_current_user(&self) -> Result<Value>;

    /// [`fetch_current_user`](Self::fetch_current_user), decoded.
    async fn current_user(&self) -> Result<User> {
        let body = self.fetch_current_user().await?;
        decode("/users/current.json", body)
    }

    /// `GET /enumerations/time_entry_activities.json`.
    async fn list_time_entry_activities(&self) -> Result<Vec<Activity>>;

    /// `GET /issue_statuses.json`.
    async fn list_issue_statuses(&self) -> Result<Vec<IssueStatus>>;
}

fn decode<T: DeserializeOwned>(path: &str, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|source| Error::Decode {
        path: path.to_string(),
        source,
    })
}

/// Fetch every project, following pagination until the reported total is
/// covered.
///
/// Pages are requested at [`MAX_PAGE_SIZE`] and the offset advances by the
/// number of projects actually returned, so a server configured with a
/// smaller cap is still walked completely. The loop also stops if the
/// tracker returns an empty page early, so a total that shrinks mid-walk
/// cannot spin forever.
///
/// # Errors
///
/// Propagates the first failing page request.
pub async fn list_all_projects(api: &dyn RedmineApi) -> Result<ProjectList> {
    let mut projects: Vec<Project> = Vec::new();
    let mut offset: u32 = 0;

    loop {
        let page = api.list_projects_page(MAX_PAGE_SIZE, offset).await?;
        let total_count = page.total_count;
        let fetched = page.projects.len();
        debug!(offset, fetched, total_count, "Fetched project page");

        projects.extend(page.projects);

        if fetched == 0 || projects.len() as u64 >= total_count {
            return Ok(ProjectList {
                projects,
                total_count,
            });
        }
        offset = offset.saturating_add(u32::try_from(fetched).unwrap_or(u32::MAX));
    }
}
