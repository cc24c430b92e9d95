//! Error types for the function-calling engine.

pub mod unified;

pub use unified::{ErrorCategory, ErrorPhase, HookKind};

use thiserror::Error;

/// Primary error type for all engine, agent and caller operations.
#[derive(Error, Debug)]
pub enum AgenticError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Declaration `{0}` is already registered")]
    DuplicateDeclaration(String),

    #[error("model call failed on iteration {iteration}: {source}")]
    ModelCall {
        iteration: usize,
        #[source]
        source: Box<AgenticError>,
    },

    #[error("tool call `{tool_name}` ({tool_call_id}) failed: {failure}")]
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        failure: ToolFailure,
    },

    #[error("{hook} hook aborted the run: {source}")]
    HookAborted {
        hook: HookKind,
        #[source]
        source: Box<AgenticError>,
    },

    #[error("Aborted: {0}")]
    Aborted(String),

    #[error("sub-agent `{agent}` failed: {source}")]
    SubAgent {
        agent: String,
        #[source]
        source: Box<AgenticError>,
    },

    #[error("Structured output error: {0}")]
    Output(String),

    #[error("tool loop exceeded {0} iterations")]
    IterationLimit(usize),

    #[error("run canceled")]
    Canceled,
}

/// Why a single tool call could not produce a result.
///
/// The display text is what gets attached to the tool call when the engine
/// continues past the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolFailure {
    #[error("declaration not found for tool: {0}")]
    NotFound(String),

    #[error("failed to decode arguments: {0}")]
    InvalidArguments(String),

    #[error("function execution error: {0}")]
    Execution(String),

    #[error("failed to encode result: {0}")]
    Serialization(String),
}

impl AgenticError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an abort signal, typically returned from a hook.
    pub fn abort(message: impl Into<String>) -> Self {
        Self::Aborted(message.into())
    }

    /// Create a tool execution error for an implementation to return.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) | Self::DuplicateDeclaration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) | Self::Output(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::ToolExecution { .. } | Self::ToolCall { .. } | Self::SubAgent { .. } => {
                ErrorCategory::ToolExecution
            }
            Self::HookAborted { .. } | Self::Aborted(_) => ErrorCategory::Hook,
            Self::Canceled => ErrorCategory::Canceled,
            Self::ModelCall { source, .. } => source.category(),
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// The loop phase a run error originated from, if it came out of a run.
    pub fn phase(&self) -> Option<ErrorPhase> {
        match self {
            Self::ModelCall { .. } => Some(ErrorPhase::ModelCall),
            Self::ToolCall { .. } => Some(ErrorPhase::ToolCall),
            Self::HookAborted { .. } => Some(ErrorPhase::Hook),
            Self::Output(_) => Some(ErrorPhase::Output),
            Self::DuplicateDeclaration(_) | Self::Configuration(_) => Some(ErrorPhase::Setup),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AgenticError>;
