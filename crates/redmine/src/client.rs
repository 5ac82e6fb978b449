//! reqwest-backed implementation of [`RedmineApi`].

use crate::api::RedmineApi;
use crate::config::Config;
use crate::domain::{
    Activity, Issue, IssueList, IssueQuery, IssueStatus, IssueUpdate, NewIssue, NewTimeEntry,
    Project, ProjectPage, ProjectRef, TimeEntry, TimeEntryQuery,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Header Redmine reads the API key from (`X-Redmine-API-Key`).
const API_KEY_HEADER: &str = "x-redmine-api-key";

#[derive(Serialize)]
struct IssueBody<'a, T> {
    issue: &'a T,
}

#[derive(Serialize)]
struct TimeEntryBody<'a> {
    time_entry: &'a NewTimeEntry,
}

#[derive(Deserialize)]
struct IssueEnvelope<T> {
    issue: T,
}

#[derive(Deserialize)]
struct ProjectEnvelope {
    project: Project,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: Value,
}

#[derive(Deserialize)]
struct TimeEntryEnvelope {
    time_entry: TimeEntry,
}

#[derive(Deserialize)]
struct ActivityCatalog {
    time_entry_activities: Vec<Activity>,
}

#[derive(Deserialize)]
struct StatusCatalog {
    issue_statuses: Vec<IssueStatus>,
}

/// HTTP client for a Redmine instance.
///
/// The API key is attached as a default header; it is marked sensitive so it
/// never shows up in debug output.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    http: Client,
}

impl HttpClient {
    /// Build a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the API key is not a valid header value, or
    /// `Error::Transport` if the underlying client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(config.api_key())
            .map_err(|_| Error::Config("API key contains invalid characters".to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("redmine-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            http,
        })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %path, "Sending Redmine request");
        self.http.request(method, url)
    }

    /// URL of a single project, with the id or slug kept inside one path
    /// segment.
    fn project_url(&self, project: &ProjectRef) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("projects")
            .push(&format!("{project}.json"));
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(&self, rb: RequestBuilder, path: &str) -> Result<T> {
        let bytes = self.send(rb, path).await?;
        serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn send(&self, rb: RequestBuilder, path: &str) -> Result<Vec<u8>> {
        let response = rb.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            Ok(bytes.to_vec())
        } else {
            debug!(%status, %path, "Redmine request failed");
            Err(error_for_status(status, path, &bytes))
        }
    }
}

/// Map a non-success response to the error taxonomy.
fn error_for_status(status: StatusCode, path: &str, body: &[u8]) -> Error {
    let body = parse_body(body);
    if status == StatusCode::NOT_FOUND {
        Error::NotFound {
            path: path.to_string(),
            body,
        }
    } else {
        Error::Api {
            status: status.as_u16(),
            path: path.to_string(),
            body,
        }
    }
}

/// Keep the body verbatim: JSON when it parses, a string otherwise.
fn parse_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(
        serde_json::from_slice(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned())),
    )
}

#[async_trait]
impl RedmineApi for HttpClient {
    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue> {
        let path = "/issues.json";
        let rb = self.request(Method::POST, path).json(&IssueBody { issue });
        let envelope: IssueEnvelope<Issue> = self.send_json(rb, path).await?;
        Ok(envelope.issue)
    }

    async fn fetch_issue(&self, id: u64, include: &[String]) -> Result<Value> {
        let path = format!("/issues/{id}.json");
        let mut rb = self.request(Method::GET, &path);
        if !include.is_empty() {
            rb = rb.query(&[("include", include.join(","))]);
        }
        let envelope: IssueEnvelope<Value> = self.send_json(rb, &path).await?;
        Ok(envelope.issue)
    }

    async fn update_issue(&self, id: u64, update: &IssueUpdate) -> Result<()> {
        let path = format!("/issues/{id}.json");
        let rb = self
            .request(Method::PUT, &path)
            .json(&IssueBody { issue: update });
        self.send(rb, &path).await?;
        Ok(())
    }

    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry> {
        let path = "/time_entries.json";
        let rb = self
            .request(Method::POST, path)
            .json(&TimeEntryBody { time_entry: entry });
        let envelope: TimeEntryEnvelope = self.send_json(rb, path).await?;
        Ok(envelope.time_entry)
    }

    async fn fetch_time_entries(&self, query: &TimeEntryQuery) -> Result<Value> {
        let path = "/time_entries.json";
        let rb = self.request(Method::GET, path).query(&query.to_pairs());
        self.send_json(rb, path).await
    }

    async fn list_issues(&self, query: &IssueQuery) -> Result<IssueList> {
        let path = "/issues.json";
        let rb = self.request(Method::GET, path).query(&query.to_pairs());
        self.send_json(rb, path).await
    }

    async fn list_projects_page(&self, limit: u32, offset: u32) -> Result<ProjectPage> {
        let path = "/projects.json";
        let rb = self
            .request(Method::GET, path)
            .query(&[("limit", limit), ("offset", offset)]);
        self.send_json(rb, path).await
    }

    async fn get_project(&self, project: &ProjectRef) -> Result<Project> {
        let url = self.project_url(project)?;
        let path = url.path().to_string();
        debug!(method = %Method::GET, %path, "Sending Redmine request");
        let rb = self.http.get(url);
        let envelope: ProjectEnvelope = self.send_json(rb, &path).await?;
        Ok(envelope.project)
    }

    async fn fetch_current_user(&self) -> Result<Value> {
        let path = "/users/current.json";
        let rb = self.request(Method::GET, path);
        let envelope: UserEnvelope = self.send_json(rb, path).await?;
        Ok(envelope.user)
    }

    async fn list_time_entry_activities(&self) -> Result<Vec<Activity>> {
        let path = "/enumerations/time_entry_activities.json";
        let rb = self.request(Method::GET, path);
        let catalog: ActivityCatalog = self.send_json(rb, path).await?;
        Ok(catalog.time_entry_activities)
    }

    async fn list_issue_statuses(&self) -> Result<Vec<IssueStatus>> {
        let path = "/issue_statuses.json";
        let rb = self.request(Method::GET, path);
        let catalog: StatusCatalog = self.send_json(rb, path).await?;
        Ok(catalog.issue_statuses)
    }
}
