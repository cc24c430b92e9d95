//! Shared test helpers and a scripted model caller.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use agentic::caller::{CallRequest, CallResponse, ModelCaller};
use agentic::error::{AgenticError, Result};
use agentic::schema::Schema;
use agentic::types::*;

type Responder = dyn Fn(usize, &CallRequest) -> Result<CallResponse> + Send + Sync;

/// A model caller whose answers are computed by a closure from the call
/// index and the request. Every request is recorded.
pub struct ScriptedCaller {
    responder: Box<Responder>,
    requests: Mutex<Vec<CallRequest>>,
}

impl ScriptedCaller {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(usize, &CallRequest) -> Result<CallResponse> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Answer with the given responses in order.
    pub fn queue(responses: Vec<CallResponse>) -> Arc<Self> {
        Self::new(move |idx, _| {
            responses
                .get(idx)
                .cloned()
                .ok_or_else(|| AgenticError::Configuration(format!("no response queued for call {idx}")))
        })
    }

    pub fn requests(&self) -> Vec<CallRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelCaller for ScriptedCaller {
    async fn call(
        &self,
        request: &CallRequest,
        _options: &CallOptions,
        _output: Option<&Schema>,
    ) -> Result<CallResponse> {
        let idx = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.responder)(idx, request)
    }
}

pub fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
    ToolCall::new(id, name, arguments)
}

pub fn tool_response(calls: Vec<ToolCall>, usage: Usage) -> CallResponse {
    let mut message = AssistantMessage::default().with_usage(usage);
    message.tool_calls = calls;
    CallResponse {
        id: "resp".into(),
        model: "scripted".into(),
        finish_reason: FinishReason::ToolCalls,
        message,
        total_usage: None,
    }
}

pub fn text_response(text: &str, usage: Usage) -> CallResponse {
    CallResponse {
        id: "final".into(),
        model: "scripted".into(),
        finish_reason: FinishReason::Stop,
        message: AssistantMessage::text(text).with_usage(usage),
        total_usage: None,
    }
}

/// Tool calls of the most recent message in a request.
pub fn last_tool_calls(request: &CallRequest) -> Vec<ToolCall> {
    request
        .messages
        .last()
        .map(|m| m.tool_calls().to_vec())
        .unwrap_or_default()
}
