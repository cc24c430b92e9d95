//! Engine configuration (layered: defaults < TOML < environment).
//!
//! ```toml
//! model = "gpt-4o"
//! compact_errors = true
//! max_iterations = 16
//!
//! [sampling]
//! temperature = 0.2
//!
//! [retry]
//! max_attempts = 4
//! backoff_ms = 250
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::EngineOptions;
use crate::error::{AgenticError, Result};
use crate::types::{CallOptions, ReasoningEffort, SamplingOptions};
use crate::util::RetryPolicy;

/// Environment variables read by [`AgenticConfig::from_env`].
pub const ENV_VARS: [&str; 10] = [
    "AGENTIC_MODEL",
    "AGENTIC_BREAK_ON_ERROR",
    "AGENTIC_COMPACT_ERRORS",
    "AGENTIC_MAX_ITERATIONS",
    "AGENTIC_RETRY_MAX_ATTEMPTS",
    "AGENTIC_RETRY_BACKOFF_MS",
    "AGENTIC_MAX_TOKENS",
    "AGENTIC_TEMPERATURE",
    "AGENTIC_TOP_P",
    "AGENTIC_REASONING_EFFORT",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            backoff_ms: policy.backoff.as_millis() as u64,
        }
    }
}

/// Defaults for engines and model callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AgenticConfig {
    pub model: String,
    pub break_on_error: bool,
    pub compact_errors: bool,
    pub max_iterations: Option<usize>,
    pub sampling: SamplingOptions,
    pub retry: RetryConfig,
}

impl AgenticConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AgenticError::Configuration(format!("invalid config: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AgenticError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Defaults overridden by `AGENTIC_*` variables; loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `AGENTIC_*` overrides resolved through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("AGENTIC_MODEL") {
            self.model = model;
        }
        if let Some(v) = parse_var(&lookup, "AGENTIC_BREAK_ON_ERROR")? {
            self.break_on_error = v;
        }
        if let Some(v) = parse_var(&lookup, "AGENTIC_COMPACT_ERRORS")? {
            self.compact_errors = v;
        }
        if let Some(v) = parse_var(&lookup, "AGENTIC_MAX_ITERATIONS")? {
            self.max_iterations = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "AGENTIC_RETRY_MAX_ATTEMPTS")? {
            self.retry.max_attempts = v;
        }
        if let Some(v) = parse_var(&lookup, "AGENTIC_RETRY_BACKOFF_MS")? {
            self.retry.backoff_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "AGENTIC_MAX_TOKENS")? {
            self.sampling.max_tokens = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "AGENTIC_TEMPERATURE")? {
            self.sampling.temperature = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "AGENTIC_TOP_P")? {
            self.sampling.top_p = Some(v);
        }
        if let Some(v) = parse_var::<ReasoningEffort, _>(&lookup, "AGENTIC_REASONING_EFFORT")? {
            self.sampling.reasoning_effort = Some(v);
        }
        Ok(self)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            model: self.model.clone(),
            sampling: self.sampling.clone(),
            call_options: CallOptions::default(),
            break_on_error: self.break_on_error,
            compact_errors: self.compact_errors,
            max_iterations: self.max_iterations,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.backoff_ms),
        )
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| AgenticError::Configuration(format!("{key}={raw}: {e}")))
}
