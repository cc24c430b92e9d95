//! The model caller contract.
//!
//! The engine never talks to an inference backend directly. It hands a
//! [`CallRequest`] to a [`ModelCaller`] and interprets the [`CallResponse`].
//! Provider adapters implement the trait; [`RetryingCaller`] layers retries on
//! top of any of them.

pub mod content;
pub mod retry;

pub use content::{clean_content, decode_output};
pub use retry::RetryingCaller;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::Schema;
use crate::types::{AssistantMessage, CallOptions, FinishReason, Message, SamplingOptions, Usage};

/// A tool as presented to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Schema>,
}

/// One request to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CallRequest {
    pub model: String,
    #[serde(default)]
    pub sampling: SamplingOptions,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// The model's answer to a [`CallRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CallResponse {
    pub id: String,
    pub model: String,
    pub finish_reason: FinishReason,
    pub message: AssistantMessage,
    /// Usage aggregated over a whole run; set by the engine on the final response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_usage: Option<Usage>,
}

impl CallResponse {
    /// Final answer: neither a tool_calls finish nor any requested calls.
    pub fn is_terminal(&self) -> bool {
        self.finish_reason != FinishReason::ToolCalls && self.message.tool_calls.is_empty()
    }
}

/// Sends requests to a model backend.
#[async_trait]
pub trait ModelCaller: Send + Sync {
    /// Perform one model call. `output` is the structured output target, if any.
    async fn call(
        &self,
        request: &CallRequest,
        options: &CallOptions,
        output: Option<&Schema>,
    ) -> Result<CallResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;

    #[test]
    fn terminal_requires_no_calls_and_non_tool_finish() {
        let mut response = CallResponse {
            finish_reason: FinishReason::Stop,
            message: AssistantMessage::text("done"),
            ..Default::default()
        };
        assert!(response.is_terminal());

        response.finish_reason = FinishReason::ToolCalls;
        assert!(!response.is_terminal());

        response.finish_reason = FinishReason::Stop;
        response.message = response.message.with_tool_call(ToolCall::new("1", "t", "{}"));
        assert!(!response.is_terminal());
    }
}
