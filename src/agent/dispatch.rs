//! Exposing an agent as a declaration of its parent.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::Agent;
use crate::error::{AgenticError, Result};
use crate::schema::{ArgumentShape, FieldDescriptor, TypeDescriptor};
use crate::tools::{Declaration, ToolExecutionContext, ToolOutput};

/// Arguments of a `call_<agent>` declaration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DispatchArguments {
    pub task: String,
    pub include_context: bool,
}

impl ArgumentShape for DispatchArguments {
    fn descriptor() -> Option<TypeDescriptor> {
        Some(TypeDescriptor::record([
            FieldDescriptor::new("task", TypeDescriptor::Text)
                .description("Task for the agent to complete")
                .required(),
            FieldDescriptor::new("include_context", TypeDescriptor::Boolean)
                .description("Whether to share the current conversation with the agent")
                .required(),
        ]))
    }
}

impl Agent {
    /// Name of the declaration exposing this agent.
    pub fn declaration_name(&self) -> String {
        format!("call_{}", self.options().name)
    }

    /// This agent as a single declaration for a parent engine.
    pub fn declaration(&self) -> Declaration {
        let agent = self.clone();
        Declaration::typed(
            self.declaration_name(),
            self.options().description.clone(),
            move |args: DispatchArguments, ctx| {
                let agent = agent.clone();
                async move { agent.dispatch(args, ctx).await }
            },
        )
        .with_terminator(self.options().terminator)
    }

    async fn dispatch(&self, args: DispatchArguments, ctx: ToolExecutionContext) -> Result<ToolOutput> {
        let mut child = self.fresh();
        if args.include_context {
            child.replay_history(&ctx.history);
        }
        debug!(
            agent = %self.options().name,
            context_entries = child.context().len(),
            "dispatching sub-agent"
        );

        let mut state = child.new_state(&args.task).with_hooks(ctx.hooks.clone());
        let response = child
            .run_with(&mut state, None, &ctx.cancel)
            .await
            .map_err(|err| match err {
                fatal @ (AgenticError::HookAborted { .. } | AgenticError::Canceled) => fatal,
                other => AgenticError::SubAgent {
                    agent: self.options().name.clone(),
                    source: Box::new(other),
                },
            })?;

        Ok(dispatch_output(&response.message.content))
    }
}

/// Final sub-agent content as a tool result: JSON objects pass through,
/// anything else is wrapped as `{"content": ...}`.
fn dispatch_output(content: &str) -> ToolOutput {
    match serde_json::from_str::<Value>(content.trim()) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut out = ToolOutput::new();
            out.insert("content".into(), Value::String(content.to_string()));
            out
        }
    }
}
