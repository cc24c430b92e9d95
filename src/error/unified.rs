//! Error classification: which loop phase failed and how to react.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    ToolExecution,
    Hook,
    Canceled,
    Unknown,
}

/// Stage of a loop run an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorPhase {
    /// Building the engine or agent (registration, option validation).
    Setup,
    /// The model caller failed.
    ModelCall,
    /// Resolving, decoding, executing or encoding a tool call.
    ToolCall,
    /// A caller-supplied hook aborted the run.
    Hook,
    /// Decoding the final structured output.
    Output,
}

/// Which state hook produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HookKind {
    BeforeToolCall,
    AfterToolCall,
    AfterToolMessage,
}
