//! Message types for model communication.

use serde::{Deserialize, Serialize};

use super::Usage;

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant(AssistantMessage),
}

impl Message {
    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::System {
            content: text.into(),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            content: text.into(),
        }
    }

    /// Create a plain assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant(AssistantMessage::text(text))
    }

    /// Text content regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System { content } | Self::User { content } => content,
            Self::Assistant(msg) => &msg.content,
        }
    }

    pub fn as_assistant(&self) -> Option<&AssistantMessage> {
        match self {
            Self::Assistant(msg) => Some(msg),
            _ => None,
        }
    }

    /// Tool calls carried by this message. Empty for non-assistant roles.
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant(msg) => &msg.tool_calls,
            _ => &[],
        }
    }
}

/// Assistant output, either a model response or a synthesized tool-result message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl AssistantMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: text.into(),
            ..Default::default()
        }
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// True when this message is a tool-result batch of exactly one failed call.
    pub fn is_single_failure(&self) -> bool {
        matches!(self.tool_calls.as_slice(), [call] if call.is_failure())
    }
}

/// A tool invocation requested by the model.
///
/// Outbound calls carry only `id`, `name` and the raw `arguments`; once the
/// engine resolves a call exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON argument text as produced by the model.
    pub arguments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
            result: None,
            error: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_some() || self.error.is_some()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Single-line rendering used when replaying history into a sub-agent.
    pub fn context_line(&self) -> String {
        let response = self
            .result
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or_default();
        format!(
            "Name: {}, Request: {}, Response: {}",
            self.name, self.arguments, response
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_serialize_with_role_tag() {
        let msg = Message::Assistant(
            AssistantMessage::text("hi").with_tool_call(ToolCall::new("1", "lookup", "{}")),
        );
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["role"], "assistant");
        assert_eq!(value["tool_calls"][0]["name"], "lookup");
        assert!(value["tool_calls"][0].get("result").is_none());

        let back: Message = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn context_line_prefers_result_then_error() {
        let mut call = ToolCall::new("1", "get_number", r#"{"n":1}"#);
        call.result = Some(r#"{"value":42}"#.into());
        assert_eq!(
            call.context_line(),
            r#"Name: get_number, Request: {"n":1}, Response: {"value":42}"#
        );

        call.result = None;
        call.error = Some("boom".into());
        assert_eq!(
            call.context_line(),
            r#"Name: get_number, Request: {"n":1}, Response: boom"#
        );
    }

    #[test]
    fn single_failure_requires_exactly_one_failed_call() {
        let mut failed = ToolCall::new("1", "a", "{}");
        failed.error = Some("x".into());
        let mut ok = ToolCall::new("2", "a", "{}");
        ok.result = Some("{}".into());

        assert!(AssistantMessage::default()
            .with_tool_call(failed.clone())
            .is_single_failure());
        assert!(!AssistantMessage::default()
            .with_tool_call(failed)
            .with_tool_call(ok.clone())
            .is_single_failure());
        assert!(!AssistantMessage::default().with_tool_call(ok).is_single_failure());
    }
}
