//! Text rendering of tool results.
//!
//! The dispatcher returns structured [`Response`] values and typed errors;
//! this module is the only place they become the text the host shows.

use crate::error::Error;
use crate::models::{
    ContextReport, DailyTimeReport, IssueTimeGroup, LoggedTime, ProjectCatalog, Response,
    TaskSummary,
};
use redmine::domain::{Activity, IssueStatus};
use serde_json::Value;
use std::fmt::{self, Write as _};

const STATUS_KEYWORDS: &str = "You can also use:\n\
    - \"open\" for all open statuses\n\
    - \"closed\" for all closed statuses\n\
    - \"*\" for all statuses";

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TaskCreated(task) => write!(
                f,
                "Task created successfully!\n\nID: {}\nSubject: {}\nStatus: {}\n\nView at: {}",
                task.id, task.subject, task.status, task.url
            ),
            Self::Echo(value) => f.write_str(&pretty(value)),
            Self::TaskUpdated(task) => write!(
                f,
                "Task #{} updated successfully!\n\nView at: {}",
                task.id, task.url
            ),
            Self::TimeLogged(logged) => write_logged(f, logged),
            Self::Tasks(list) => {
                let scope = list
                    .project
                    .as_ref()
                    .map(|p| format!(" (Project: {p})"))
                    .unwrap_or_default();
                write!(
                    f,
                    "Found {} tasks{scope} (showing {}):\n\n",
                    list.total_count,
                    list.tasks.len()
                )?;
                write_tasks(f, &list.tasks)
            }
            Self::DailyTime(report) => write_daily(f, report),
            Self::Activities(activities) => {
                f.write_str("Available time entry activities:\n\n")?;
                write_activities(f, activities)
            }
            Self::Statuses(statuses) => {
                f.write_str("Available issue statuses:\n\n")?;
                write_statuses(f, statuses)?;
                write!(f, "\n\n{STATUS_KEYWORDS}")
            }
            Self::StatusPrompt(statuses) => {
                f.write_str("Please specify a status_id to filter your issues.\n\n")?;
                f.write_str("Available issue statuses:\n\n")?;
                write_statuses(f, statuses)?;
                write!(f, "\n\n{STATUS_KEYWORDS}\n\n")?;
                f.write_str(
                    "Example: Use check_my_issues with status_id parameter set to \"open\" \
                     to see all your open issues.",
                )
            }
            Self::MyTasks(list) => {
                write!(
                    f,
                    "Found {} issues assigned to {} (showing {}):\n\n",
                    list.total_count,
                    list.login,
                    list.tasks.len()
                )?;
                write_tasks(f, &list.tasks)
            }
            Self::Projects(catalog) => write_projects(f, catalog),
            Self::ProjectSet(project) => write!(
                f,
                "Current project set to: {} (ID: {})",
                project.name, project.id
            ),
            Self::CurrentProject(Some(project)) => {
                write!(f, "Current project: {} (ID: {})", project.name, project.id)
            }
            Self::CurrentProject(None) => {
                f.write_str("No current project set. Use set_current_project to set one.")
            }
            Self::TaskSet(task) => {
                write!(f, "Current task set to: #{} - {}", task.id, task.subject)
            }
            Self::CurrentTask(Some(task)) => {
                write!(f, "Current task: #{} - {}", task.id, task.subject)
            }
            Self::CurrentTask(None) => {
                f.write_str("No current task set. Use set_current_task to set one.")
            }
            Self::Context(report) => write_context(f, report),
            Self::ContextCleared => f.write_str("All context cleared (project and task)."),
        }
    }
}

/// Failure text: the message, then the tracker's payload when there is one.
#[must_use]
pub fn render_error(error: &Error) -> String {
    let mut text = format!("Error: {error}");
    if let Some(detail) = error.detail() {
        let _ = write!(text, "\n\nDetails: {}", pretty(detail));
    }
    text
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn write_logged(f: &mut fmt::Formatter<'_>, logged: &LoggedTime) -> fmt::Result {
    write!(
        f,
        "Time logged successfully!\n\nHours: {}\nIssue: #{}\nActivity: {}\nComments: {}",
        logged.hours,
        logged.issue_id,
        logged.activity,
        logged.comments.as_deref().unwrap_or("N/A")
    )
}

fn write_tasks(f: &mut fmt::Formatter<'_>, tasks: &[TaskSummary]) -> fmt::Result {
    let lines: Vec<String> = tasks
        .iter()
        .map(|t| format!("#{}: {} [{}]", t.id, t.subject, t.status))
        .collect();
    f.write_str(&lines.join("\n"))
}

fn write_activities(f: &mut fmt::Formatter<'_>, activities: &[Activity]) -> fmt::Result {
    let lines: Vec<String> = activities
        .iter()
        .map(|a| {
            let default = if a.is_default { " (default)" } else { "" };
            format!("{}: {}{default}", a.id, a.name)
        })
        .collect();
    f.write_str(&lines.join("\n"))
}

fn write_statuses(f: &mut fmt::Formatter<'_>, statuses: &[IssueStatus]) -> fmt::Result {
    let lines: Vec<String> = statuses
        .iter()
        .map(|s| {
            let default = if s.is_default { " (default)" } else { "" };
            let state = if s.is_closed { "[Closed]" } else { "[Open]" };
            format!("{}: {}{default} {state}", s.id, s.name)
        })
        .collect();
    f.write_str(&lines.join("\n"))
}

fn write_projects(f: &mut fmt::Formatter<'_>, catalog: &ProjectCatalog) -> fmt::Result {
    write!(
        f,
        "Available projects ({} of {}):\n\n",
        catalog.projects.len(),
        catalog.total_count
    )?;
    let lines: Vec<String> = catalog
        .projects
        .iter()
        .map(|p| format!("{}: {} ({})", p.id, p.name, p.identifier))
        .collect();
    f.write_str(&lines.join("\n"))
}

fn write_daily(f: &mut fmt::Formatter<'_>, report: &DailyTimeReport) -> fmt::Result {
    if report.is_empty() {
        return f.write_str("No time entries logged today.");
    }

    write!(f, "Time entries for {}:\n\n", report.date)?;
    for group in &report.groups {
        write_group(f, group)?;
    }
    write!(f, "Total hours today: {}h", report.total_hours)
}

fn write_group(f: &mut fmt::Formatter<'_>, group: &IssueTimeGroup) -> fmt::Result {
    match group.issue_id {
        Some(id) => writeln!(f, "Issue #{id}: {}h", group.hours)?,
        None => writeln!(f, "No issue: {}h", group.hours)?,
    }
    for entry in &group.entries {
        write!(f, "  - {}h ({})", entry.hours, entry.activity)?;
        if let Some(comments) = &entry.comments {
            write!(f, ": {comments}")?;
        }
        f.write_char('\n')?;
    }
    f.write_char('\n')
}

fn write_context(f: &mut fmt::Formatter<'_>, report: &ContextReport) -> fmt::Result {
    f.write_str("Current context:\n\n")?;
    match &report.project {
        Some(project) => writeln!(f, "Project: {} (ID: {})", project.name, project.id)?,
        None => f.write_str("Project: Not set\n")?,
    }
    match &report.task {
        Some(task) => writeln!(f, "Task: #{} - {}", task.id, task.subject),
        None => f.write_str("Task: Not set\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreatedTask, IssueTimeGroup, ProjectSummary, TaskRef, TimeEntryLine};
    use serde_json::json;

    #[test]
    fn test_created_task_text() {
        let text = Response::TaskCreated(CreatedTask {
            id: 42,
            subject: "Fix login".to_string(),
            status: "New".to_string(),
            url: "https://redmine.example.com/issues/42".to_string(),
        })
        .to_string();
        assert_eq!(
            text,
            "Task created successfully!\n\nID: 42\nSubject: Fix login\nStatus: New\n\n\
             View at: https://redmine.example.com/issues/42"
        );
    }

    #[test]
    fn test_daily_report_text() {
        let report = DailyTimeReport {
            date: "2024-05-02".to_string(),
            groups: vec![
                IssueTimeGroup {
                    issue_id: Some(10),
                    hours: 3.5,
                    entries: vec![
                        TimeEntryLine {
                            hours: 2.0,
                            activity: "Development".to_string(),
                            comments: Some("API".to_string()),
                        },
                        TimeEntryLine {
                            hours: 1.5,
                            activity: "Development".to_string(),
                            comments: None,
                        },
                    ],
                },
                IssueTimeGroup {
                    issue_id: Some(20),
                    hours: 3.0,
                    entries: vec![TimeEntryLine {
                        hours: 3.0,
                        activity: "Support".to_string(),
                        comments: None,
                    }],
                },
            ],
            total_hours: 6.5,
        };

        assert_eq!(
            Response::DailyTime(report).to_string(),
            "Time entries for 2024-05-02:\n\n\
             Issue #10: 3.5h\n  - 2h (Development): API\n  - 1.5h (Development)\n\n\
             Issue #20: 3h\n  - 3h (Support)\n\n\
             Total hours today: 6.5h"
        );
    }

    #[test]
    fn test_empty_daily_report_text() {
        let report = DailyTimeReport {
            date: "2024-05-02".to_string(),
            groups: vec![],
            total_hours: 0.0,
        };
        assert_eq!(
            Response::DailyTime(report).to_string(),
            "No time entries logged today."
        );
    }

    #[test]
    fn test_statuses_flag_default_and_closed() {
        let text = Response::Statuses(vec![
            IssueStatus {
                id: 1,
                name: "New".to_string(),
                is_default: true,
                is_closed: false,
            },
            IssueStatus {
                id: 5,
                name: "Closed".to_string(),
                is_default: false,
                is_closed: true,
            },
        ])
        .to_string();
        assert!(text.contains("1: New (default) [Open]"));
        assert!(text.contains("5: Closed [Closed]"));
        assert!(text.contains("\"*\" for all statuses"));
    }

    #[test]
    fn test_context_text() {
        let text = Response::Context(ContextReport {
            project: Some(ProjectSummary {
                id: 1,
                name: "Website".to_string(),
                identifier: "web".to_string(),
            }),
            task: None,
        })
        .to_string();
        assert_eq!(
            text,
            "Current context:\n\nProject: Website (ID: 1)\nTask: Not set\n"
        );

        let text = Response::CurrentTask(Some(TaskRef {
            id: 7,
            subject: "Ship it".to_string(),
        }))
        .to_string();
        assert_eq!(text, "Current task: #7 - Ship it");
    }

    #[test]
    fn test_error_text_includes_details() {
        let err = Error::Remote(redmine::Error::Api {
            status: 422,
            path: "/issues.json".to_string(),
            body: Some(json!({"errors": ["Subject cannot be blank"]})),
        });
        let text = render_error(&err);
        assert!(text.starts_with("Error: "));
        assert!(text.contains("\n\nDetails: {"));
        assert!(text.contains("Subject cannot be blank"));
    }

    #[test]
    fn test_local_error_has_no_details() {
        let err = Error::MissingContext {
            field: "project_id",
            setter: "set_current_project",
        };
        assert_eq!(
            render_error(&err),
            "Error: project_id is required. Either provide it or set a default using \
             set_current_project."
        );
    }
}
