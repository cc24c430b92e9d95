use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::types::{CallOptions, SamplingOptions};

/// Per-engine request settings and loop policy.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineOptions {
    #[builder(into)]
    pub model: String,
    #[builder(default)]
    #[serde(default)]
    pub sampling: SamplingOptions,
    #[builder(default)]
    #[serde(default)]
    pub call_options: CallOptions,
    /// Abort the run on the first tool-call failure instead of reporting it
    /// back to the model.
    #[builder(default)]
    #[serde(default)]
    pub break_on_error: bool,
    /// Drop a previous single-call failure when the model fails the same tool again.
    #[builder(default)]
    #[serde(default)]
    pub compact_errors: bool,
    /// Upper bound on model calls per run. Unbounded when unset.
    pub max_iterations: Option<usize>,
}
