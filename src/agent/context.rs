//! Context buffer pushed into an agent's runs.

use crate::types::Message;

const CONTEXT_PREFIX: &str = "Additional context: ";

pub(crate) fn context_message(content: &str) -> Message {
    Message::system(format!("{CONTEXT_PREFIX}{content}"))
}

/// Render a parent's visible history as context entries.
///
/// System messages are skipped. Each user message and each assistant message
/// becomes one entry, followed by one entry per tool call the assistant
/// message carries.
pub(crate) fn replay_entries(history: &[Message]) -> Vec<String> {
    let mut entries = Vec::new();
    for message in history {
        match message {
            Message::System { .. } => {}
            Message::User { content } => entries.push(content.clone()),
            Message::Assistant(assistant) => {
                entries.push(assistant.content.clone());
                entries.extend(assistant.tool_calls.iter().map(|call| call.context_line()));
            }
        }
    }
    entries
}
