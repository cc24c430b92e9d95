//! MCP session backed by an initialized `rmcp` client service.

use async_trait::async_trait;
use rmcp::{
    model::{CallToolRequestParams, CallToolResult, Content, JsonObject},
    service::{DynService, RoleClient, RunningService, ServiceError},
};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{McpContent, McpToolInfo, McpToolResult, McpToolSession};
use crate::error::{AgenticError, Result};

type DynClientService = Box<dyn DynService<RoleClient>>;
pub type McpRunningService = RunningService<RoleClient, DynClientService>;

/// [`McpToolSession`] over an `rmcp` running service.
///
/// The initialize handshake is performed by `rmcp`'s `serve(...)` before the
/// service is handed over; transport setup stays with the caller.
pub struct RmcpSession {
    service: Mutex<McpRunningService>,
}

impl RmcpSession {
    pub fn new(service: McpRunningService) -> Self {
        Self {
            service: Mutex::new(service),
        }
    }
}

#[async_trait]
impl McpToolSession for RmcpSession {
    async fn list_tools(&self) -> Result<Vec<McpToolInfo>> {
        let service = self.service.lock().await;
        if service.is_closed() {
            return Err(AgenticError::Network("MCP session is closed".into()));
        }

        let tools = match service.list_all_tools().await {
            Ok(tools) => tools,
            Err(ServiceError::UnexpectedResponse) => {
                service
                    .list_tools(None)
                    .await
                    .map_err(|e| map_service_error("list_tools", e))?
                    .tools
            }
            Err(e) => return Err(map_service_error("list_tools", e)),
        };

        Ok(tools.into_iter().map(map_mcp_tool).collect())
    }

    async fn call_tool(&self, name: &str, arguments: Option<JsonObject>) -> Result<McpToolResult> {
        let service = self.service.lock().await;
        let result = service
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_owned().into(),
                arguments,
                task: None,
            })
            .await
            .map_err(|e| map_service_error("call_tool", e))?;

        Ok(map_call_result(result))
    }
}

fn map_mcp_tool(tool: rmcp::model::Tool) -> McpToolInfo {
    McpToolInfo {
        name: tool.name.to_string(),
        description: tool.description.map(|d| d.to_string()),
        input_schema: Value::Object((*tool.input_schema).clone()),
    }
}

fn map_content(item: &Content) -> McpContent {
    if let Some(text) = item.as_text() {
        return McpContent::Text(text.text.clone());
    }
    let kind = serde_json::to_value(item)
        .ok()
        .and_then(|v| v.get("type").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());
    McpContent::Other(kind)
}

fn map_call_result(result: CallToolResult) -> McpToolResult {
    McpToolResult {
        content: result.content.iter().map(map_content).collect(),
        is_error: result.is_error.unwrap_or(false),
    }
}

fn map_service_error(context: &str, error: ServiceError) -> AgenticError {
    match error {
        ServiceError::McpError(error) => AgenticError::Provider {
            provider: "mcp".into(),
            message: format!("{context}: MCP error {}: {}", error.code.0, error.message),
        },
        ServiceError::TransportSend(error) => {
            AgenticError::Network(format!("{context}: MCP transport send failed: {error}"))
        }
        ServiceError::TransportClosed => {
            AgenticError::Network(format!("{context}: MCP transport closed"))
        }
        ServiceError::UnexpectedResponse => AgenticError::Provider {
            provider: "mcp".into(),
            message: format!("{context}: unexpected MCP response"),
        },
        ServiceError::Timeout { timeout } => AgenticError::Timeout(timeout.as_millis() as u64),
        other => AgenticError::Provider {
            provider: "mcp".into(),
            message: format!("{context}: MCP service error: {other}"),
        },
    }
}
