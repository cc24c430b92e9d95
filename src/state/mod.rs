//! Conversation state: fixed initial messages, messages produced by a run,
//! and the hooks the run reports to.

pub mod hooks;

pub use hooks::{
    AfterToolCall, AfterToolCallHook, AfterToolMessageHook, BeforeToolCall, BeforeToolCallHook,
    StateHooks,
};

use serde::Serialize;

use crate::types::{AssistantMessage, Message};

/// Ordered message history for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationState {
    initial_messages: Vec<Message>,
    produced_messages: Vec<Message>,
    #[serde(skip)]
    hooks: StateHooks,
}

impl ConversationState {
    pub fn new(initial_messages: Vec<Message>) -> Self {
        Self {
            initial_messages,
            produced_messages: Vec::new(),
            hooks: StateHooks::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: StateHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Initial messages followed by everything the run produced.
    pub fn messages(&self) -> Vec<Message> {
        self.initial_messages
            .iter()
            .chain(self.produced_messages.iter())
            .cloned()
            .collect()
    }

    pub fn initial_messages(&self) -> &[Message] {
        &self.initial_messages
    }

    pub fn produced_messages(&self) -> &[Message] {
        &self.produced_messages
    }

    pub fn hooks(&self) -> &StateHooks {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut StateHooks {
        &mut self.hooks
    }

    /// Copy the hooks of `other`. Messages are left untouched.
    pub fn inherit(&mut self, other: &ConversationState) {
        self.hooks = other.hooks.clone();
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.produced_messages.push(message);
    }

    /// Drop the most recent produced single-failure message if it failed on
    /// `tool_name`. Only the newest single-failure message is considered.
    pub(crate) fn compact_failure(&mut self, tool_name: &str) -> bool {
        let found = self
            .produced_messages
            .iter()
            .rposition(|m| m.as_assistant().is_some_and(AssistantMessage::is_single_failure));
        match found {
            Some(idx) if self.produced_messages[idx].tool_calls()[0].name == tool_name => {
                self.produced_messages.remove(idx);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;

    fn failure(name: &str) -> Message {
        let mut call = ToolCall::new("id", name, "{}");
        call.error = Some("bad".into());
        Message::Assistant(AssistantMessage::default().with_tool_call(call))
    }

    #[test]
    fn messages_are_initial_then_produced() {
        let mut state = ConversationState::new(vec![Message::system("s"), Message::user("u")]);
        state.push(Message::assistant("a"));

        let contents: Vec<_> = state
            .messages()
            .iter()
            .map(|m| m.content().to_string())
            .collect();
        assert_eq!(contents, vec!["s", "u", "a"]);
        assert_eq!(state.initial_messages().len(), 2);
    }

    #[test]
    fn inherit_copies_hooks_only() {
        let parent = ConversationState::new(vec![Message::user("parent")])
            .with_hooks(StateHooks::new().on_after_tool_message(|_| async { Ok(()) }));
        let mut child = ConversationState::new(vec![Message::user("child")]);

        child.inherit(&parent);

        assert!(child.hooks().after_tool_message.is_some());
        assert!(child.hooks().before_tool_call.is_none());
        assert_eq!(child.messages().len(), 1);
        assert_eq!(child.messages()[0].content(), "child");
    }

    #[test]
    fn compaction_targets_only_latest_single_failure() {
        let mut state = ConversationState::new(vec![Message::user("u")]);
        state.push(failure("alpha"));
        state.push(failure("beta"));

        assert!(!state.compact_failure("alpha"));
        assert_eq!(state.produced_messages().len(), 2);

        assert!(state.compact_failure("beta"));
        assert_eq!(state.produced_messages().len(), 1);
        assert_eq!(state.produced_messages()[0].tool_calls()[0].name, "alpha");
    }

    #[test]
    fn compaction_never_touches_initial_messages() {
        let mut state = ConversationState::new(vec![failure("alpha")]);
        assert!(!state.compact_failure("alpha"));
        assert_eq!(state.messages().len(), 1);
    }
}
