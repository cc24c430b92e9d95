//! The tool-call loop.
//!
//! A run alternates between asking the model and executing the tool calls it
//! requests until the model returns a final answer:
//!
//! 1. send `state.messages()` plus every registered declaration as a tool,
//! 2. if the response is terminal, append it and return,
//! 3. otherwise resolve each requested call in order, append one tool-result
//!    message carrying the whole batch, and go back to 1.
//!
//! Tool-call failures are either reported back to the model on the call
//! (`break_on_error = false`, the default) or end the run. Hook errors and
//! model call errors always end the run.

mod options;
mod tool_phase;


pub use options::EngineOptions;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::caller::{decode_output, CallRequest, CallResponse, ModelCaller};
use crate::error::{AgenticError, HookKind, Result};
use crate::schema::{schema_for, ArgumentShape, Schema};
use crate::state::ConversationState;
use crate::tools::{Declaration, DeclarationRegistry, ToolOutput};
use crate::types::{AssistantMessage, FinishReason, Message, Usage};

/// Structured output decoded from the final response of a run.
#[derive(Debug, Clone)]
pub struct TypedResponse<T> {
    pub output: T,
    pub response: CallResponse,
}

/// Drives the tool-call loop for a set of declarations.
#[derive(Clone)]
pub struct Engine {
    caller: Arc<dyn ModelCaller>,
    options: EngineOptions,
    registry: DeclarationRegistry,
}

impl Engine {
    pub fn new(caller: Arc<dyn ModelCaller>, options: EngineOptions) -> Self {
        Self {
            caller,
            options,
            registry: DeclarationRegistry::new(),
        }
    }

    /// Register a declaration. Fails on a duplicate name.
    pub fn add_declaration(&mut self, declaration: Declaration) -> Result<()> {
        self.registry.add(declaration)
    }

    pub fn add_declarations(
        &mut self,
        declarations: impl IntoIterator<Item = Declaration>,
    ) -> Result<()> {
        self.registry.extend(declarations)
    }

    pub fn registry(&self) -> &DeclarationRegistry {
        &self.registry
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Run to completion without structured output or external cancellation.
    pub async fn run(&self, state: &mut ConversationState) -> Result<CallResponse> {
        self.run_with(state, None, &CancellationToken::new()).await
    }

    /// Run to completion.
    ///
    /// On success the returned response carries `total_usage` summed over
    /// every model response of the run, and the final assistant message has
    /// been appended to `state`.
    pub async fn run_with(
        &self,
        state: &mut ConversationState,
        output: Option<&Schema>,
        cancel: &CancellationToken,
    ) -> Result<CallResponse> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "engine_run",
            %run_id,
            model = %self.options.model,
            tools = self.registry.len()
        );
        self.run_loop(state, output, cancel).instrument(span).await
    }

    /// Run with `T`'s schema as the output target and decode the final content.
    pub async fn run_typed<T>(
        &self,
        state: &mut ConversationState,
        cancel: &CancellationToken,
    ) -> Result<TypedResponse<T>>
    where
        T: ArgumentShape + DeserializeOwned,
    {
        let schema = schema_for::<T>();
        let response = self.run_with(state, schema.as_ref(), cancel).await?;
        let output = decode_output(&response.message.content)?;
        Ok(TypedResponse { output, response })
    }

    async fn run_loop(
        &self,
        state: &mut ConversationState,
        output: Option<&Schema>,
        cancel: &CancellationToken,
    ) -> Result<CallResponse> {
        let mut usage = Usage::default();
        let mut iteration = 0usize;

        loop {
            if cancel.is_cancelled() {
                return Err(AgenticError::Canceled);
            }
            if let Some(max) = self.options.max_iterations {
                if iteration >= max {
                    return Err(AgenticError::IterationLimit(max));
                }
            }
            iteration += 1;

            let request = CallRequest {
                model: self.options.model.clone(),
                sampling: self.options.sampling.clone(),
                messages: state.messages(),
                tools: self.registry.to_tools(),
            };
            debug!(
                iteration,
                messages = request.messages.len(),
                "calling model"
            );

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AgenticError::Canceled),
                result = self.caller.call(&request, &self.options.call_options, output) => result,
            };
            let mut response = result.map_err(|source| AgenticError::ModelCall {
                iteration,
                source: Box::new(source),
            })?;

            if let Some(message_usage) = &response.message.usage {
                usage.merge(message_usage);
            }

            if response.is_terminal() {
                debug!(
                    iteration,
                    finish_reason = %response.finish_reason,
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "run finished"
                );
                state.push(Message::Assistant(response.message.clone()));
                response.total_usage = Some(usage);
                return Ok(response);
            }

            let batch = self.execute_batch(state, &response, cancel).await?;

            if let Some(hook) = &state.hooks().after_tool_message {
                hook(batch.message.clone())
                    .await
                    .map_err(|source| AgenticError::HookAborted {
                        hook: HookKind::AfterToolMessage,
                        source: Box::new(source),
                    })?;
            }

            if self.options.compact_errors && batch.message.tool_calls.len() == 1 {
                let tool_name = batch.message.tool_calls[0].name.clone();
                if state.compact_failure(&tool_name) {
                    debug!(tool = %tool_name, "compacted earlier tool failure");
                }
            }

            state.push(Message::Assistant(batch.message));

            if let Some(result) = batch.terminator {
                debug!(iteration, "terminator declaration completed the run");
                let message = AssistantMessage::text(terminator_content(&result));
                state.push(Message::Assistant(message.clone()));
                return Ok(CallResponse {
                    id: response.id,
                    model: response.model,
                    finish_reason: FinishReason::Stop,
                    message,
                    total_usage: Some(usage),
                });
            }
        }
    }
}

fn terminator_content(result: &ToolOutput) -> String {
    match result.get("content") {
        Some(Value::String(content)) => content.clone(),
        _ => Value::Object(result.clone()).to_string(),
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .finish()
    }
}
