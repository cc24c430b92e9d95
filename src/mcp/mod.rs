//! Model Context Protocol (MCP) tools as declarations.
//!
//! [`McpToolSession`] is the narrow contract the adapter needs from an MCP
//! client: list tools and call one. [`mcp_declarations`] turns every listed
//! tool into a [`Declaration`](crate::tools::Declaration). With the `mcp`
//! feature, [`client::RmcpSession`] implements the contract on top of an
//! initialized `rmcp` client service.

#[cfg(feature = "mcp")]
pub mod client;
pub mod source;

#[cfg(feature = "mcp")]
pub use client::RmcpSession;
pub use source::{mcp_declarations, tool_output};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A tool as listed by an MCP server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct McpToolInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub input_schema: Value,
}

/// One content item of a tool call result.
#[derive(Debug, Clone, PartialEq)]
pub enum McpContent {
    Text(String),
    /// Any non-text content; carries the content type for error reporting.
    Other(String),
}

/// Result of an MCP tool call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct McpToolResult {
    pub content: Vec<McpContent>,
    pub is_error: bool,
}

impl McpToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![McpContent::Text(text.into())],
            is_error: false,
        }
    }
}

/// An initialized MCP client session.
#[async_trait]
pub trait McpToolSession: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<McpToolInfo>>;

    async fn call_tool(&self, name: &str, arguments: Option<Map<String, Value>>) -> Result<McpToolResult>;
}
