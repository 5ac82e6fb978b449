//! Protocol-level tests for `RedmineMcpServer`.
//!
//! These drive the server through an in-process rmcp client over a duplex
//! pipe, so tool calls take the same path as calls from a real host.

use redmine::fake::{ApiCall, FakeRedmine};
use redmine_mcp::RedmineMcpServer;
use redmine_mcp::operation::OPERATION_NAMES;
use rmcp::model::{CallToolRequestParam, CallToolResult};
use rmcp::service::RunningService;
use rmcp::{RoleClient, ServiceExt};
use serde_json::{Value, json};
use std::sync::Arc;

mod helpers {
    use super::*;

    /// Serve `fake` on one end of a duplex pipe and connect a client to the
    /// other.
    pub async fn connect(fake: Arc<FakeRedmine>) -> RunningService<RoleClient, ()> {
        let (server_io, client_io) = tokio::io::duplex(4096);
        let server = RedmineMcpServer::new(fake, "https://redmine.example.com");

        tokio::spawn(async move {
            if let Ok(service) = server.serve(server_io).await {
                let _ = service.waiting().await;
            }
        });

        ().serve(client_io).await.unwrap()
    }

    pub async fn call(
        client: &RunningService<RoleClient, ()>,
        name: &str,
        args: Value,
    ) -> CallToolResult {
        client
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: args.as_object().cloned(),
            })
            .await
            .unwrap()
    }

    pub fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

use helpers::*;

#[tokio::test]
async fn test_lists_every_tool() {
    let client = connect(Arc::new(FakeRedmine::new())).await;

    let tools = client.list_all_tools().await.unwrap();
    let names: Vec<&str> = tools.iter().map(|t| &*t.name).collect();

    assert_eq!(names.len(), OPERATION_NAMES.len());
    for name in OPERATION_NAMES {
        assert!(names.contains(&name), "missing tool {name}");
    }

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_unknown_tool_is_an_error_result() {
    let fake = Arc::new(FakeRedmine::new());
    let client = connect(fake.clone()).await;

    let result = call(&client, "delete_everything", json!({})).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text(&result), "Error: Unknown tool: delete_everything");
    assert!(fake.calls().is_empty());

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_malformed_arguments_are_an_error_result() {
    let fake = Arc::new(FakeRedmine::new().with_issue(10, 1, "Fix login"));
    let client = connect(fake.clone()).await;

    let result = call(&client, "get_task", json!({"issue_id": "abc"})).await;

    assert_eq!(result.is_error, Some(true));
    let text = text(&result);
    assert!(text.starts_with("Error: "), "{text}");
    assert!(text.contains("get_task"), "{text}");
    assert!(fake.calls().is_empty());

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_tool_call_reaches_dispatcher() {
    let fake = Arc::new(FakeRedmine::new().with_project(1, "Website", "web"));
    let client = connect(fake.clone()).await;

    let result = call(&client, "set_current_project", json!({"project_id": "web"})).await;
    assert_ne!(result.is_error, Some(true), "{}", text(&result));

    let result = call(&client, "get_current_project", json!({})).await;
    assert_eq!(text(&result), "Current project: Website (ID: 1)");

    // Missing context is reported as a result, not a protocol error.
    let result = call(&client, "get_task", json!({})).await;
    assert_eq!(result.is_error, Some(true));
    assert!(fake.calls().iter().all(|c| !matches!(c, ApiCall::GetIssue { .. })));

    client.cancel().await.unwrap();
}
