//! Convenience re-exports.

pub use crate::agent::{Agent, AgentOptions};
pub use crate::caller::{CallRequest, CallResponse, ModelCaller, RetryingCaller, ToolDefinition};
pub use crate::config::AgenticConfig;
pub use crate::engine::{Engine, EngineOptions, TypedResponse};
pub use crate::error::{AgenticError, Result};
pub use crate::schema::{
    schema_for, ArgumentShape, FieldDescriptor, Schema, SchemaBuilder, TypeDescriptor,
};
pub use crate::state::{ConversationState, StateHooks};
pub use crate::tools::{Declaration, Tool, ToolArguments, ToolExecutionContext, ToolOutput};
pub use crate::types::*;
pub use crate::util::RetryPolicy;
