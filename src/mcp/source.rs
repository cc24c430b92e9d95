//! Adapter from an MCP session to declarations.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{McpContent, McpToolResult, McpToolSession};
use crate::error::{AgenticError, Result};
use crate::schema::Schema;
use crate::tools::{Declaration, ToolOutput};

/// List the session's tools and wrap each as a declaration that calls back
/// into the session.
pub async fn mcp_declarations(session: Arc<dyn McpToolSession>) -> Result<Vec<Declaration>> {
    let tools = session.list_tools().await?;
    debug!(count = tools.len(), "listed MCP tools");

    Ok(tools
        .into_iter()
        .map(|tool| {
            let schema = Schema::from_json_schema(&tool.input_schema);
            let name = tool.name.clone();
            let session = Arc::clone(&session);
            Declaration::new(
                tool.name,
                tool.description.unwrap_or_default(),
                Some(schema),
                move |args, _ctx| {
                    let session = Arc::clone(&session);
                    let name = name.clone();
                    async move {
                        let arguments = match args.into_value() {
                            Value::Object(map) => Some(map),
                            Value::Null => None,
                            other => {
                                return Err(AgenticError::InvalidArgument(format!(
                                    "MCP tool arguments must be a JSON object; got {other}"
                                )))
                            }
                        };
                        let result = session.call_tool(&name, arguments).await?;
                        tool_output(&name, result)
                    }
                },
            )
        })
        .collect())
}

/// Convert an MCP call result into a tool result.
///
/// The first content item decides: empty text means success with no payload,
/// JSON object text is returned as-is and other text is wrapped as
/// `{"r": ...}`. Error results fail the call.
pub fn tool_output(name: &str, result: McpToolResult) -> Result<ToolOutput> {
    if result.is_error {
        let message = result
            .content
            .iter()
            .filter_map(|c| match c {
                McpContent::Text(text) => Some(text.as_str()),
                McpContent::Other(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        let message = if message.is_empty() {
            "MCP tool returned an error result".to_string()
        } else {
            message
        };
        return Err(AgenticError::tool(name, message));
    }

    let mut output = ToolOutput::new();
    match result.content.into_iter().next() {
        None => {
            output.insert("success".into(), Value::Bool(true));
        }
        Some(McpContent::Text(text)) if text.is_empty() => {
            output.insert("success".into(), Value::Bool(true));
        }
        Some(McpContent::Text(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => output = map,
            _ => {
                output.insert("r".into(), Value::String(text));
            }
        },
        Some(McpContent::Other(kind)) => {
            return Err(AgenticError::tool(
                name,
                format!("unsupported MCP content type: {kind}"),
            ))
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::McpToolInfo;
    use crate::tools::{ToolArguments, ToolExecutionContext};
    use async_trait::async_trait;
    use serde_json::{json, Map};
    use std::sync::Mutex;

    struct FakeSession {
        calls: Mutex<Vec<(String, Option<Map<String, Value>>)>>,
    }

    #[async_trait]
    impl McpToolSession for FakeSession {
        async fn list_tools(&self) -> Result<Vec<McpToolInfo>> {
            Ok(vec![McpToolInfo {
                name: "weather".into(),
                description: Some("Look up weather".into()),
                input_schema: json!({
                    "type": "object",
                    "properties": {"city": {"type": "string"}, "days": {"type": "integer"}},
                    "required": ["city"]
                }),
            }])
        }

        async fn call_tool(
            &self,
            name: &str,
            arguments: Option<Map<String, Value>>,
        ) -> Result<McpToolResult> {
            self.calls.lock().unwrap().push((name.to_string(), arguments));
            Ok(McpToolResult::text(r#"{"temp": 21}"#))
        }
    }

    #[tokio::test]
    async fn declarations_delegate_to_the_session() {
        let session = Arc::new(FakeSession {
            calls: Mutex::new(Vec::new()),
        });
        let declarations = mcp_declarations(session.clone()).await.unwrap();

        assert_eq!(declarations.len(), 1);
        let weather = &declarations[0];
        assert_eq!(weather.name(), "weather");
        assert_eq!(weather.description(), "Look up weather");
        let schema = weather.schema().unwrap();
        assert_eq!(schema.property("days"), Some(&Schema::number()));
        assert!(schema.is_required("city"));

        let out = weather
            .execute(
                ToolArguments::new(json!({"city": "Oslo"})),
                ToolExecutionContext::detached("weather"),
            )
            .await
            .unwrap();
        assert_eq!(Value::Object(out), json!({"temp": 21}));

        let calls = session.calls.lock().unwrap();
        assert_eq!(calls[0].0, "weather");
        assert_eq!(
            calls[0].1.as_ref().and_then(|m| m.get("city")),
            Some(&json!("Oslo"))
        );
    }

    #[test]
    fn text_results_fall_back_to_raw_field() {
        let out = tool_output("t", McpToolResult::text("sunny")).unwrap();
        assert_eq!(Value::Object(out), json!({"r": "sunny"}));

        let out = tool_output("t", McpToolResult::text("[1, 2]")).unwrap();
        assert_eq!(Value::Object(out), json!({"r": "[1, 2]"}));
    }

    #[test]
    fn empty_results_mean_success() {
        let out = tool_output("t", McpToolResult::text("")).unwrap();
        assert_eq!(Value::Object(out), json!({"success": true}));

        let out = tool_output("t", McpToolResult::default()).unwrap();
        assert_eq!(Value::Object(out), json!({"success": true}));
    }

    #[test]
    fn error_results_fail_the_call() {
        let err = tool_output(
            "t",
            McpToolResult {
                content: vec![McpContent::Text("city not found".into())],
                is_error: true,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AgenticError::ToolExecution { ref message, .. } if message == "city not found"
        ));
    }

    #[test]
    fn non_text_content_is_rejected() {
        let err = tool_output(
            "t",
            McpToolResult {
                content: vec![McpContent::Other("image".into())],
                is_error: false,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("unsupported MCP content type: image"));
    }
}
