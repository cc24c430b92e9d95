//! Lifecycle hooks observed by the tool-call loop.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::tools::ToolOutput;
use crate::types::AssistantMessage;

/// Payload for the hook that runs before a declaration executes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeforeToolCall {
    pub tool_call_id: String,
    pub tool_name: String,
    pub arguments: Value,
}

/// Payload for the hook that runs after a declaration executes.
///
/// Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AfterToolCall {
    pub tool_call_id: String,
    pub tool_name: String,
    pub arguments: Value,
    pub result: Option<ToolOutput>,
    pub error: Option<String>,
}

/// May return replacement arguments. An error aborts the run.
pub type BeforeToolCallHook =
    Arc<dyn Fn(BeforeToolCall) -> BoxFuture<'static, Result<Option<Value>>> + Send + Sync>;

/// May return a replacement result. An error aborts the run.
pub type AfterToolCallHook =
    Arc<dyn Fn(AfterToolCall) -> BoxFuture<'static, Result<Option<ToolOutput>>> + Send + Sync>;

/// Observes each synthesized tool-result message before it is appended.
pub type AfterToolMessageHook =
    Arc<dyn Fn(AssistantMessage) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// The three hooks a conversation state carries.
#[derive(Clone, Default)]
pub struct StateHooks {
    pub before_tool_call: Option<BeforeToolCallHook>,
    pub after_tool_call: Option<AfterToolCallHook>,
    pub after_tool_message: Option<AfterToolMessageHook>,
}

impl StateHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_before_tool_call<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(BeforeToolCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>>> + Send + 'static,
    {
        self.before_tool_call = Some(Arc::new(move |call| Box::pin(hook(call))));
        self
    }

    pub fn on_after_tool_call<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(AfterToolCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<ToolOutput>>> + Send + 'static,
    {
        self.after_tool_call = Some(Arc::new(move |call| Box::pin(hook(call))));
        self
    }

    pub fn on_after_tool_message<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(AssistantMessage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.after_tool_message = Some(Arc::new(move |msg| Box::pin(hook(msg))));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.before_tool_call.is_none()
            && self.after_tool_call.is_none()
            && self.after_tool_message.is_none()
    }
}

impl std::fmt::Debug for StateHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateHooks")
            .field("before_tool_call", &self.before_tool_call.is_some())
            .field("after_tool_call", &self.after_tool_call.is_some())
            .field("after_tool_message", &self.after_tool_message.is_some())
            .finish()
    }
}
