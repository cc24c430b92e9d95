//! Resolution of one batch of tool calls.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Engine;
use crate::caller::CallResponse;
use crate::error::{AgenticError, HookKind, Result, ToolFailure};
use crate::state::{AfterToolCall, BeforeToolCall, ConversationState, StateHooks};
use crate::tools::{validate_arguments, Declaration, ToolArguments, ToolExecutionContext, ToolOutput};
use crate::types::{AssistantMessage, Message, ToolCall};

pub(super) struct BatchOutcome {
    /// Tool-result message: the response content plus every resolved call.
    pub(super) message: AssistantMessage,
    /// Output of the first successful terminator call, if any.
    pub(super) terminator: Option<ToolOutput>,
}

enum CallOutcome {
    Resolved { text: String, output: ToolOutput },
    Failed(ToolFailure),
}

impl Engine {
    pub(super) async fn execute_batch(
        &self,
        state: &ConversationState,
        response: &CallResponse,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome> {
        let history = state.messages();
        let mut resolved = Vec::with_capacity(response.message.tool_calls.len());
        let mut terminator = None;

        for call in &response.message.tool_calls {
            let mut call = call.clone();
            match self
                .execute_call(state.hooks(), &history, &call, cancel)
                .await?
            {
                CallOutcome::Resolved { text, output } => {
                    let is_terminator = self
                        .registry
                        .lookup(&call.name)
                        .is_some_and(|d| d.is_terminator());
                    if is_terminator && terminator.is_none() {
                        terminator = Some(output);
                    }
                    call.result = Some(text);
                }
                CallOutcome::Failed(failure) => {
                    call.error = Some(failure.to_string());
                }
            }
            resolved.push(call);
        }

        Ok(BatchOutcome {
            message: AssistantMessage {
                content: response.message.content.clone(),
                tool_calls: resolved,
                usage: response.message.usage,
            },
            terminator,
        })
    }

    async fn execute_call(
        &self,
        hooks: &StateHooks,
        history: &[Message],
        call: &ToolCall,
        cancel: &CancellationToken,
    ) -> Result<CallOutcome> {
        debug!(tool = %call.name, tool_call_id = %call.id, "executing tool call");

        let Some(declaration) = self.registry.lookup(&call.name) else {
            return self
                .gate(call, ToolFailure::NotFound(call.name.clone()))
                .map(CallOutcome::Failed);
        };

        let mut arguments = match decode_arguments(call, declaration) {
            Ok(arguments) => arguments,
            Err(failure) => return self.gate(call, failure).map(CallOutcome::Failed),
        };

        if let Some(hook) = &hooks.before_tool_call {
            let replacement = hook(BeforeToolCall {
                tool_call_id: call.id.clone(),
                tool_name: call.name.clone(),
                arguments: arguments.raw().clone(),
            })
            .await
            .map_err(|source| AgenticError::HookAborted {
                hook: HookKind::BeforeToolCall,
                source: Box::new(source),
            })?;
            if let Some(replacement) = replacement {
                arguments = ToolArguments::new(replacement);
            }
        }

        let ctx = ToolExecutionContext {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            hooks: hooks.clone(),
            history: history.to_vec(),
            cancel: cancel.child_token(),
        };
        let raw_arguments = arguments.raw().clone();

        let executed = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AgenticError::Canceled),
            result = declaration.execute(arguments, ctx) => result,
        };

        let mut output = match executed {
            Ok(output) => output,
            Err(err) => {
                if cancel.is_cancelled() {
                    return Err(AgenticError::Canceled);
                }
                let failure = match err {
                    fatal @ (AgenticError::HookAborted { .. } | AgenticError::Canceled) => {
                        return Err(fatal)
                    }
                    other => self.gate(call, execution_failure(other))?,
                };
                if let Some(hook) = &hooks.after_tool_call {
                    hook(AfterToolCall {
                        tool_call_id: call.id.clone(),
                        tool_name: call.name.clone(),
                        arguments: raw_arguments,
                        result: None,
                        error: Some(failure.to_string()),
                    })
                    .await
                    .map_err(|source| AgenticError::HookAborted {
                        hook: HookKind::AfterToolCall,
                        source: Box::new(source),
                    })?;
                }
                return Ok(CallOutcome::Failed(failure));
            }
        };

        if let Some(hook) = &hooks.after_tool_call {
            let replacement = hook(AfterToolCall {
                tool_call_id: call.id.clone(),
                tool_name: call.name.clone(),
                arguments: raw_arguments,
                result: Some(output.clone()),
                error: None,
            })
            .await
            .map_err(|source| AgenticError::HookAborted {
                hook: HookKind::AfterToolCall,
                source: Box::new(source),
            })?;
            if let Some(replacement) = replacement {
                output = replacement;
            }
        }

        match serde_json::to_string(&output) {
            Ok(text) => Ok(CallOutcome::Resolved { text, output }),
            Err(e) => self
                .gate(call, ToolFailure::Serialization(e.to_string()))
                .map(CallOutcome::Failed),
        }
    }

    /// Apply the error policy to a failed call.
    fn gate(&self, call: &ToolCall, failure: ToolFailure) -> Result<ToolFailure> {
        if self.options.break_on_error {
            return Err(AgenticError::ToolCall {
                tool_call_id: call.id.clone(),
                tool_name: call.name.clone(),
                failure,
            });
        }
        warn!(
            tool = %call.name,
            tool_call_id = %call.id,
            error = %failure,
            "tool call failed, reporting to model"
        );
        Ok(failure)
    }
}

fn decode_arguments(
    call: &ToolCall,
    declaration: &Declaration,
) -> std::result::Result<ToolArguments, ToolFailure> {
    let arguments = ToolArguments::parse(&call.arguments)
        .map_err(|e| ToolFailure::InvalidArguments(e.to_string()))?;
    if let Some(schema) = declaration.schema() {
        validate_arguments(arguments.raw(), schema).map_err(ToolFailure::InvalidArguments)?;
    }
    declaration
        .check_arguments(&arguments)
        .map_err(|err| match err {
            AgenticError::InvalidArgument(message) => ToolFailure::InvalidArguments(message),
            other => ToolFailure::InvalidArguments(other.to_string()),
        })?;
    Ok(arguments)
}

fn execution_failure(err: AgenticError) -> ToolFailure {
    match err {
        AgenticError::InvalidArgument(message) => ToolFailure::InvalidArguments(message),
        AgenticError::Serialization(e) => ToolFailure::Serialization(e.to_string()),
        AgenticError::ToolExecution { message, .. } => ToolFailure::Execution(message),
        other => ToolFailure::Execution(other.to_string()),
    }
}
