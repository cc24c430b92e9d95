use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::engine::EngineOptions;
use crate::error::{AgenticError, Result};
use crate::types::{CallOptions, SamplingOptions};

/// Identity, request settings and loop policy of an agent.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq)]
pub struct AgentOptions {
    /// Slug-like name; the dispatch declaration is `call_<name>`.
    #[builder(into)]
    pub name: String,
    /// System prompt for every run.
    #[builder(into)]
    pub persona: String,
    /// Shown to a parent model as the dispatch tool description.
    #[builder(into)]
    pub description: String,
    #[builder(into)]
    pub model: String,
    #[builder(default)]
    #[serde(default)]
    pub sampling: SamplingOptions,
    #[builder(default)]
    #[serde(default)]
    pub call_options: CallOptions,
    /// A successful dispatch to this agent ends the parent run.
    #[builder(default)]
    #[serde(default)]
    pub terminator: bool,
    #[builder(default)]
    #[serde(default)]
    pub break_on_error: bool,
    #[builder(default)]
    #[serde(default)]
    pub compact_errors: bool,
    pub max_iterations: Option<usize>,
}

impl AgentOptions {
    pub fn validate(&self) -> Result<()> {
        if !is_slug(&self.name) {
            return Err(AgenticError::Configuration(format!(
                "agent name `{}` must be a non-empty slug of lowercase letters, digits, '-' or '_'",
                self.name
            )));
        }
        if self.persona.trim().is_empty() {
            return Err(AgenticError::Configuration(format!(
                "agent `{}` needs a persona",
                self.name
            )));
        }
        if self.description.trim().is_empty() {
            return Err(AgenticError::Configuration(format!(
                "agent `{}` needs a description",
                self.name
            )));
        }
        Ok(())
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            model: self.model.clone(),
            sampling: self.sampling.clone(),
            call_options: self.call_options.clone(),
            break_on_error: self.break_on_error,
            compact_errors: self.compact_errors,
            max_iterations: self.max_iterations,
        }
    }
}

fn is_slug(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(name: &str) -> AgentOptions {
        AgentOptions::builder()
            .name(name)
            .persona("You research things.")
            .description("Researcher")
            .model("m")
            .build()
    }

    #[test]
    fn accepts_slug_names() {
        assert!(options("web-research_2").validate().is_ok());
    }

    #[test]
    fn rejects_bad_names_and_blank_fields() {
        assert!(options("").validate().is_err());
        assert!(options("Web Research").validate().is_err());

        let mut blank = options("ok");
        blank.persona = "  ".into();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn engine_options_carry_policy() {
        let mut opts = options("a");
        opts.break_on_error = true;
        opts.max_iterations = Some(4);

        let engine = opts.engine_options();
        assert_eq!(engine.model, "m");
        assert!(engine.break_on_error);
        assert_eq!(engine.max_iterations, Some(4));
    }
}
