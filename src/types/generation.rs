//! Sampling options, call options and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Sampling parameters forwarded to the model caller on every request.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct SamplingOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub reasoning_effort: Option<ReasoningEffort>,
}

/// Reasoning effort level for reasoning models.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReasoningEffort {
    None,
    Minimal,
    Low,
    Medium,
    High,
}

/// Per-call options passed through untouched to the model caller.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct CallOptions {
    #[builder(into)]
    pub schema_name: Option<String>,
    #[builder(into)]
    pub schema_description: Option<String>,
    /// Opaque provider-specific request fields.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    #[builder(default)]
    pub extra_fields: serde_json::Map<String, serde_json::Value>,
}

/// Why generation finished.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    #[default]
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Error,
}
