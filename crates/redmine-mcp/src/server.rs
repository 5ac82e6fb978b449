//! MCP server implementation.
//!
//! This module contains the main server setup using rmcp.

use crate::context::Context;
use crate::models::{
    CheckMyIssuesParams, CreateTaskParams, GetTaskParams, ListTasksParams, LogTimeParams,
    SetCurrentProjectParams, SetCurrentTaskParams, TimeEntriesParams, UpdateTaskParams,
};
use crate::operation::Operation;
use crate::render::render_error;
use crate::tools::Tools;
use redmine::RedmineApi;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{
    ErrorData as McpError, RoleServer, ServiceExt, handler::server::ServerHandler, tool,
    tool_router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// The redmine MCP server.
///
/// Provides MCP protocol handling over stdio transport.
#[derive(Clone)]
pub struct RedmineMcpServer {
    /// Shared current project/task.
    context: Arc<Mutex<Context>>,
    /// Tool implementations.
    tools: Arc<Tools>,
    /// Tool router for MCP dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RedmineMcpServer {
    /// Create a task, assigned to the caller by default.
    #[tool(
        description = "Create a new task in Redmine. Uses the current project if project_id is not given, and assigns the task to you unless assigned_to_id is set."
    )]
    async fn create_task(
        &self,
        Parameters(params): Parameters<CreateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::CreateTask(params)).await)
    }

    /// Show one task as the tracker returns it.
    #[tool(
        description = "Get details of a specific task. Uses the current task if issue_id is not given."
    )]
    async fn get_task(
        &self,
        Parameters(params): Parameters<GetTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::GetTask(params)).await)
    }

    /// Change selected fields of a task or add a note.
    #[tool(
        description = "Update an existing task. Only the fields you pass are changed; notes are added as a comment."
    )]
    async fn update_task(
        &self,
        Parameters(params): Parameters<UpdateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::UpdateTask(params)).await)
    }

    /// Log hours against a task.
    #[tool(
        description = "Log time spent on a task. hours and activity_id are required; use list_activities to find activity IDs."
    )]
    async fn log_time(
        &self,
        Parameters(params): Parameters<LogTimeParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::LogTime(params)).await)
    }

    /// List tasks matching the given filters.
    #[tool(description = "List tasks with optional project, assignee and status filters.")]
    async fn list_tasks(
        &self,
        Parameters(params): Parameters<ListTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::ListTasks(params)).await)
    }

    /// List the time entries of one task.
    #[tool(description = "Get time entries logged against a task.")]
    async fn get_time_entries(
        &self,
        Parameters(params): Parameters<TimeEntriesParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::GetTimeEntries(params)).await)
    }

    /// Report today's time entries grouped by task.
    #[tool(description = "Get your time entries for today, grouped by task with hour totals.")]
    async fn get_today_time_entries(&self) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::GetTodayTimeEntries).await)
    }

    /// List the time entry activities.
    #[tool(description = "List available time entry activities (Development, Support, ...).")]
    async fn list_activities(&self) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::ListActivities).await)
    }

    /// List the issue statuses.
    #[tool(description = "List available issue statuses, marking the default and closed ones.")]
    async fn list_issue_statuses(&self) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::ListIssueStatuses).await)
    }

    /// List the tasks assigned to the caller.
    #[tool(
        description = "List tasks assigned to you. Without status_id, lists the available statuses so you can pick one."
    )]
    async fn check_my_issues(
        &self,
        Parameters(params): Parameters<CheckMyIssuesParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::CheckMyIssues(params)).await)
    }

    /// List every accessible project.
    #[tool(description = "List all projects you have access to.")]
    async fn list_projects(&self) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::ListProjects).await)
    }

    /// Show the authenticated user.
    #[tool(description = "Get information about the authenticated user.")]
    async fn get_current_user(&self) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::GetCurrentUser).await)
    }

    /// Remember a project for later calls.
    #[tool(
        description = "Set the current project used when project_id is omitted. Call list_projects first to see available projects."
    )]
    async fn set_current_project(
        &self,
        Parameters(params): Parameters<SetCurrentProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::SetCurrentProject(params)).await)
    }

    /// Show the remembered project.
    #[tool(description = "Show the current project.")]
    async fn get_current_project(&self) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::GetCurrentProject).await)
    }

    /// Remember a task for later calls.
    #[tool(description = "Set the current task used when issue_id is omitted.")]
    async fn set_current_task(
        &self,
        Parameters(params): Parameters<SetCurrentTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::SetCurrentTask(params)).await)
    }

    /// Show the remembered task.
    #[tool(description = "Show the current task.")]
    async fn get_current_task(&self) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::GetCurrentTask).await)
    }

    /// Show the remembered project and task.
    #[tool(description = "Show the current project and task.")]
    async fn get_context(&self) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::GetContext).await)
    }

    /// Forget the remembered project and task.
    #[tool(description = "Clear the current project and task.")]
    async fn clear_context(&self) -> Result<CallToolResult, McpError> {
        Ok(self.run(Operation::ClearContext).await)
    }
}

impl RedmineMcpServer {
    /// Create a server backed by `api`.
    ///
    /// `base_url` is used for browser links in results.
    pub fn new(api: Arc<dyn RedmineApi>, base_url: impl Into<String>) -> Self {
        let context = Arc::new(Mutex::new(Context::new()));
        let tools = Arc::new(Tools::new(api, Arc::clone(&context), base_url));

        Self {
            context,
            tools,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the context.
    #[must_use]
    pub fn context(&self) -> &Arc<Mutex<Context>> {
        &self.context
    }

    /// Run one operation and render its outcome.
    ///
    /// Failures become error results, never protocol errors.
    async fn run(&self, operation: Operation) -> CallToolResult {
        let name = operation.name();
        match self.tools.execute(operation).await {
            Ok(response) => CallToolResult::success(vec![Content::text(response.to_string())]),
            Err(e) => {
                warn!(tool = name, kind = ?e.kind(), error = %e, "Tool invocation failed");
                CallToolResult::error(vec![Content::text(render_error(&e))])
            }
        }
    }

    /// Serve over stdio until the host disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails to start or stops abnormally.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        info!("Serving MCP over stdio");
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

impl ServerHandler for RedmineMcpServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }

    /// Every call goes through [`Operation::from_call`], so an unknown name or
    /// a malformed argument bag comes back as an error result.
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        match Operation::from_call(&request.name, request.arguments) {
            Ok(operation) => Ok(self.run(operation).await),
            Err(e) => {
                warn!(tool = %request.name, kind = ?e.kind(), error = %e, "Rejected tool call");
                Ok(CallToolResult::error(vec![Content::text(render_error(&e))]))
            }
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "redmine-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Redmine MCP server for task tracking. Use set_current_project and \
                 set_current_task to avoid repeating ids."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OPERATION_NAMES;
    use redmine::fake::FakeRedmine;
    use rmcp::handler::server::ServerHandler;

    fn server() -> RedmineMcpServer {
        RedmineMcpServer::new(Arc::new(FakeRedmine::new()), "https://redmine.example.com")
    }

    #[test]
    fn test_server_creation() {
        let server = server();
        assert!(server.context().try_lock().is_ok());
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "redmine-mcp");
        assert!(!info.server_info.version.is_empty());
        assert!(info.instructions.is_some());
    }

    #[test]
    fn test_tool_router_has_all_tools() {
        let server = server();
        let tools = server.tool_router.list_all();
        let tool_names: Vec<&str> = tools.iter().map(|t| &*t.name).collect();

        for name in OPERATION_NAMES {
            assert!(tool_names.contains(&name), "missing tool {name}");
        }
        assert_eq!(tools.len(), OPERATION_NAMES.len());
    }

    #[tokio::test]
    async fn test_failure_becomes_error_result() {
        let result = server().run(Operation::GetCurrentTask).await;
        assert_ne!(result.is_error, Some(true));

        let result = server()
            .run(Operation::GetTask(GetTaskParams::default()))
            .await;
        assert_eq!(result.is_error, Some(true));
    }
}
