//! Agents: a persona, a model, declarations and child agents.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::context::{context_message, replay_entries};
use super::options::AgentOptions;
use crate::caller::{CallResponse, ModelCaller};
use crate::engine::{Engine, TypedResponse};
use crate::error::Result;
use crate::schema::{ArgumentShape, Schema};
use crate::state::ConversationState;
use crate::tools::Declaration;
use crate::types::Message;

/// An agent that runs tasks through the tool-call loop and can be exposed to
/// a parent agent as a single tool.
#[derive(Clone)]
pub struct Agent {
    caller: Arc<dyn ModelCaller>,
    options: AgentOptions,
    declarations: Vec<Declaration>,
    subagents: Vec<Agent>,
    context: Vec<Message>,
}

impl Agent {
    /// Create an agent. Options are validated up front.
    pub fn new(caller: Arc<dyn ModelCaller>, options: AgentOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            caller,
            options,
            declarations: Vec::new(),
            subagents: Vec::new(),
            context: Vec::new(),
        })
    }

    /// Add a declaration.
    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn add_declaration(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    /// Add a child agent, exposed as `call_<child name>`.
    pub fn with_subagent(mut self, subagent: Agent) -> Self {
        self.subagents.push(subagent);
        self
    }

    pub fn add_subagent(&mut self, subagent: Agent) {
        self.subagents.push(subagent);
    }

    /// Append a system context entry included in every later run.
    pub fn context_push(&mut self, content: impl AsRef<str>) {
        self.context.push(context_message(content.as_ref()));
    }

    /// Push the parent's visible history as context entries.
    pub fn replay_history(&mut self, history: &[Message]) {
        for entry in replay_entries(history) {
            self.context_push(entry);
        }
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    pub fn context(&self) -> &[Message] {
        &self.context
    }

    pub fn subagents(&self) -> &[Agent] {
        &self.subagents
    }

    /// Initial state for a task: persona, context entries, then the task.
    pub fn new_state(&self, task: &str) -> ConversationState {
        let mut messages = Vec::with_capacity(self.context.len() + 2);
        messages.push(Message::system(self.options.persona.clone()));
        messages.extend(self.context.iter().cloned());
        messages.push(Message::user(task));
        ConversationState::new(messages)
    }

    /// Engine over own declarations plus one dispatch declaration per child.
    pub fn engine(&self) -> Result<Engine> {
        let mut engine = Engine::new(Arc::clone(&self.caller), self.options.engine_options());
        engine.add_declarations(self.declarations.iter().cloned())?;
        engine.add_declarations(self.subagents.iter().map(Agent::declaration))?;
        Ok(engine)
    }

    /// Run a top-level task to completion.
    pub async fn run(&self, task: &str) -> Result<CallResponse> {
        let mut state = self.new_state(task);
        self.run_with(&mut state, None, &CancellationToken::new())
            .await
    }

    /// Run on a prepared state.
    pub async fn run_with(
        &self,
        state: &mut ConversationState,
        output: Option<&Schema>,
        cancel: &CancellationToken,
    ) -> Result<CallResponse> {
        let engine = self.engine()?;
        let span = tracing::info_span!("agent_run", agent = %self.options.name);
        engine.run_with(state, output, cancel).instrument(span).await
    }

    /// Run a task and decode the final content as `T`.
    pub async fn run_typed<T>(&self, task: &str, cancel: &CancellationToken) -> Result<TypedResponse<T>>
    where
        T: ArgumentShape + DeserializeOwned,
    {
        let engine = self.engine()?;
        let mut state = self.new_state(task);
        let span = tracing::info_span!("agent_run", agent = %self.options.name);
        engine.run_typed(&mut state, cancel).instrument(span).await
    }

    /// Same caller, options, declarations and children; empty context.
    pub(crate) fn fresh(&self) -> Self {
        Self {
            caller: Arc::clone(&self.caller),
            options: self.options.clone(),
            declarations: self.declarations.clone(),
            subagents: self.subagents.clone(),
            context: Vec::new(),
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.options.name)
            .field("declarations", &self.declarations.len())
            .field(
                "subagents",
                &self.subagents.iter().map(Agent::name).collect::<Vec<_>>(),
            )
            .field("context", &self.context.len())
            .finish()
    }
}
