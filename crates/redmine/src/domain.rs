//! Typed views of Redmine entities and request payloads.
//!
//! Entities fetched from the tracker keep the fields they were sent with:
//! the commonly used ones are typed, the rest land in a flattened `extra`
//! map. Absent optional fields and explicit nulls both read as `None`, so
//! callers that must echo a payload byte-for-byte use the raw
//! [`RedmineApi`](crate::api::RedmineApi) fetches instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Reference to another entity as embedded by the tracker (`{id, name}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Numeric id of the referenced entity.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Fields not modelled above (`is_closed` on statuses, `type` on
    /// principals, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NamedRef {
    /// Create a reference.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// Reference to an issue (`{id}`), used for parents and time entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    /// Issue id.
    pub id: u64,
}

/// A project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Numeric id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Human-readable slug.
    pub identifier: String,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An issue (task).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Numeric id.
    pub id: u64,
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    /// Tracker (Bug, Feature, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<NamedRef>,
    /// Workflow status.
    pub status: NamedRef,
    /// Priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NamedRef>,
    /// Title.
    pub subject: String,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<NamedRef>,
    /// Estimated effort.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    /// Parent issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<IssueRef>,
    /// Fields not modelled above (journals, relations, watchers, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A logged block of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Numeric id.
    pub id: u64,
    /// Issue the time was logged against; project-level entries have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<IssueRef>,
    /// Author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<NamedRef>,
    /// Activity category.
    pub activity: NamedRef,
    /// Hours spent.
    pub hours: f64,
    /// Free-form comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Day the work happened.
    pub spent_on: NaiveDate,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A time-entry activity from the enumeration catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Numeric id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Whether this is the default activity.
    #[serde(default)]
    pub is_default: bool,
}

/// A workflow status from the status catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueStatus {
    /// Numeric id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Whether new issues start in this status.
    #[serde(default)]
    pub is_default: bool,
    /// Whether issues in this status count as closed.
    #[serde(default)]
    pub is_closed: bool,
}

/// An account on the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric id.
    pub id: u64,
    /// Login name.
    pub login: String,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A page of issues plus the filtered total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueList {
    /// Issues on this page.
    pub issues: Vec<Issue>,
    /// Number of issues matching the filter across all pages.
    pub total_count: u64,
    /// Offset of this page.
    #[serde(default)]
    pub offset: u64,
    /// Page size the tracker applied.
    #[serde(default)]
    pub limit: u64,
}

/// A page of time entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntryList {
    /// Entries on this page.
    pub time_entries: Vec<TimeEntry>,
    /// Number of entries matching the filter across all pages.
    #[serde(default)]
    pub total_count: u64,
    /// Offset of this page.
    #[serde(default)]
    pub offset: u64,
    /// Page size the tracker applied.
    #[serde(default)]
    pub limit: u64,
}

/// A single page of the project listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPage {
    /// Projects on this page.
    pub projects: Vec<Project>,
    /// Number of projects across all pages.
    pub total_count: u64,
    /// Offset of this page.
    #[serde(default)]
    pub offset: u64,
    /// Page size the tracker applied.
    #[serde(default)]
    pub limit: u64,
}

/// The complete project listing, aggregated across pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectList {
    /// Every project, in the order the tracker returned them.
    pub projects: Vec<Project>,
    /// Total reported by the tracker.
    pub total_count: u64,
}

/// A project addressed either by numeric id or by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectRef {
    /// Numeric id.
    Id(u64),
    /// Slug (`identifier`).
    Identifier(String),
}

impl ProjectRef {
    /// Interpret raw input, treating all-digit strings as numeric ids.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.trim().parse::<u64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Identifier(raw),
        }
    }

    /// Whether this reference addresses `project`.
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            Self::Id(id) => project.id == *id,
            Self::Identifier(slug) => project.identifier == *slug,
        }
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Identifier(slug) => f.write_str(slug),
        }
    }
}

impl From<u64> for ProjectRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

/// Payload for creating an issue.
///
/// Optional fields are omitted from the request when unset, leaving the
/// tracker's own defaults in effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssue {
    /// Owning project.
    pub project_id: ProjectRef,
    /// Title.
    pub subject: String,
    /// Body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tracker id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker_id: Option<u64>,
    /// Initial status id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
    /// Priority id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,
    /// Assignee user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<u64>,
    /// Parent issue id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_issue_id: Option<u64>,
    /// Estimated effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
}

impl NewIssue {
    /// Start a payload with only the required fields set.
    pub fn new(project_id: ProjectRef, subject: impl Into<String>) -> Self {
        Self {
            project_id,
            subject: subject.into(),
            description: None,
            tracker_id: None,
            status_id: None,
            priority_id: None,
            assigned_to_id: None,
            parent_issue_id: None,
            estimated_hours: None,
        }
    }
}

/// Partial update for an issue.
///
/// Only fields that are `Some` are serialized, so untouched fields keep
/// their current value on the tracker. `notes` is appended as a journal
/// comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// New body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
    /// New assignee user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<u64>,
    /// Comment to append.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl IssueUpdate {
    /// Whether the update would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Payload for logging time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTimeEntry {
    /// Issue to log against.
    pub issue_id: u64,
    /// Hours spent.
    pub hours: f64,
    /// Activity id; the tracker rejects entries without one.
    pub activity_id: u64,
    /// Day of the work; the tracker defaults to today when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_on: Option<NaiveDate>,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Assignee filter for issue listings: a user id or a keyword such as `me`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeFilter {
    /// Specific user id.
    Id(u64),
    /// Keyword understood by the tracker (`me`).
    Keyword(String),
}

impl fmt::Display for AssigneeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Keyword(keyword) => f.write_str(keyword),
        }
    }
}

/// Filters for `GET /issues.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueQuery {
    /// Restrict to one project.
    pub project_id: Option<ProjectRef>,
    /// Restrict to one assignee.
    pub assigned_to_id: Option<AssigneeFilter>,
    /// Status id, or one of `open`, `closed`, `*`.
    pub status_id: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
    /// Page offset.
    pub offset: Option<u32>,
}

impl IssueQuery {
    /// Query-string pairs for the set filters.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(project) = &self.project_id {
            pairs.push(("project_id", project.to_string()));
        }
        if let Some(assignee) = &self.assigned_to_id {
            pairs.push(("assigned_to_id", assignee.to_string()));
        }
        if let Some(status) = &self.status_id {
            pairs.push(("status_id", status.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

/// Filters for `GET /time_entries.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeEntryQuery {
    /// Restrict to one issue.
    pub issue_id: Option<u64>,
    /// Restrict to one day.
    pub spent_on: Option<NaiveDate>,
    /// Restrict to one user id, or `me`.
    pub user_id: Option<AssigneeFilter>,
}

impl TimeEntryQuery {
    /// Entries logged against one issue.
    #[must_use]
    pub fn for_issue(issue_id: u64) -> Self {
        Self {
            issue_id: Some(issue_id),
            ..Self::default()
        }
    }

    /// Entries the authenticated user logged on `date`.
    #[must_use]
    pub fn mine_on(date: NaiveDate) -> Self {
        Self {
            spent_on: Some(date),
            user_id: Some(AssigneeFilter::Keyword("me".to_string())),
            ..Self::default()
        }
    }

    /// Query-string pairs for the set filters.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(issue_id) = self.issue_id {
            pairs.push(("issue_id", issue_id.to_string()));
        }
        if let Some(date) = self.spent_on {
            pairs.push(("spent_on", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(user) = &self.user_id {
            pairs.push(("user_id", user.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::numeric("42", ProjectRef::Id(42))]
    #[case::padded(" 7 ", ProjectRef::Id(7))]
    #[case::slug("web-site", ProjectRef::Identifier("web-site".to_string()))]
    #[case::mixed("v2", ProjectRef::Identifier("v2".to_string()))]
    fn test_project_ref_parse(#[case] raw: &str, #[case] expected: ProjectRef) {
        assert_eq!(ProjectRef::parse(raw), expected);
    }

    #[test]
    fn test_issue_update_omits_unset_fields() {
        let update = IssueUpdate {
            notes: Some("Investigated".to_string()),
            ..IssueUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"notes": "Investigated"})
        );
        assert!(!update.is_empty());
        assert!(IssueUpdate::default().is_empty());
    }

    #[test]
    fn test_issue_keeps_nested_unknown_fields() {
        let body = json!({
            "id": 10,
            "project": {"id": 1, "name": "Website"},
            "status": {"id": 5, "name": "Closed", "is_closed": true},
            "assigned_to": {"id": 3, "name": "Dev Team", "type": "Group"},
            "subject": "Fix login",
            "custom_fields": [{"id": 2, "name": "Sprint", "value": "12"}],
        });

        let issue: Issue = serde_json::from_value(body.clone()).unwrap();

        assert_eq!(issue.status.extra["is_closed"], json!(true));
        assert_eq!(
            issue.assigned_to.as_ref().unwrap().extra["type"],
            json!("Group")
        );
        assert_eq!(serde_json::to_value(&issue).unwrap(), body);
    }

    #[test]
    fn test_new_issue_serializes_project_ref_as_number_or_string() {
        let by_id = NewIssue::new(ProjectRef::Id(3), "Fix login");
        assert_eq!(
            serde_json::to_value(&by_id).unwrap(),
            json!({"project_id": 3, "subject": "Fix login"})
        );

        let by_slug = NewIssue::new(ProjectRef::Identifier("web".to_string()), "Fix login");
        assert_eq!(serde_json::to_value(&by_slug).unwrap()["project_id"], "web");
    }

    #[test]
    fn test_issue_keeps_unmodelled_fields() {
        let raw = json!({
            "id": 5,
            "subject": "Crash on save",
            "status": {"id": 1, "name": "New"},
            "journals": [{"id": 1, "notes": "seen"}],
            "done_ratio": 30
        });
        let issue: Issue = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(issue.status.name, "New");
        assert_eq!(issue.extra["done_ratio"], 30);
        assert_eq!(serde_json::to_value(&issue).unwrap(), raw);
    }

    #[test]
    fn test_issue_query_pairs() {
        let query = IssueQuery {
            project_id: Some(ProjectRef::Identifier("web".to_string())),
            assigned_to_id: Some(AssigneeFilter::Keyword("me".to_string())),
            status_id: Some("open".to_string()),
            limit: Some(25),
            offset: None,
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("project_id", "web".to_string()),
                ("assigned_to_id", "me".to_string()),
                ("status_id", "open".to_string()),
                ("limit", "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_time_entry_query_for_today() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            TimeEntryQuery::mine_on(date).to_pairs(),
            vec![
                ("spent_on", "2024-03-09".to_string()),
                ("user_id", "me".to_string()),
            ]
        );
        assert_eq!(
            TimeEntryQuery::for_issue(12).to_pairs(),
            vec![("issue_id", "12".to_string())]
        );
    }
}
