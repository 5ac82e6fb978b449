//! MCP server for Redmine task tracking.
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes a
//! Redmine instance's task tracking to AI assistants.
//!
//! # Architecture
//!
//! Tool calls are decoded into a typed [`Operation`](operation::Operation),
//! run by the [`Tools`](tools::Tools) dispatcher against the
//! [`RedmineApi`](redmine::RedmineApi) trait, and rendered to text at the
//! server boundary. A shared [`Context`](context::Context) holds the current
//! project and task that operations fall back to.
//!
//! # Tools
//!
//! ## Tasks
//! - `create_task` - Create a task (assigned to you by default)
//! - `get_task` - Show a task verbatim
//! - `update_task` - Change selected fields, or add a note
//! - `list_tasks` - List tasks with filters
//! - `check_my_issues` - Tasks assigned to you
//!
//! ## Time tracking
//! - `log_time` - Log hours against a task
//! - `get_time_entries` - Entries for one task
//! - `get_today_time_entries` - Your entries for today, grouped by task
//!
//! ## Catalogs
//! - `list_activities`, `list_issue_statuses`, `list_projects`,
//!   `get_current_user`
//!
//! ## Context Management
//! - `set_current_project` / `get_current_project`
//! - `set_current_task` / `get_current_task`
//! - `get_context` / `clear_context`

pub mod context;
pub mod error;
pub mod models;
pub mod operation;
pub mod render;
pub mod server;
pub mod tools;

pub use error::{Error, ErrorKind, Result};
pub use operation::Operation;
pub use server::RedmineMcpServer;
