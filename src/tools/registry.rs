//! Ordered, name-unique collection of declarations.

use crate::caller::ToolDefinition;
use crate::error::{AgenticError, Result};

use super::Declaration;

/// Declarations registered with an engine, in registration order.
#[derive(Debug, Clone, Default)]
pub struct DeclarationRegistry {
    declarations: Vec<Declaration>,
}

impl DeclarationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration. Names must be unique within the registry.
    pub fn add(&mut self, declaration: Declaration) -> Result<()> {
        if declaration.name().is_empty() {
            return Err(AgenticError::Configuration(
                "declaration name must not be empty".into(),
            ));
        }
        if self.lookup(declaration.name()).is_some() {
            return Err(AgenticError::DuplicateDeclaration(
                declaration.name().to_string(),
            ));
        }
        self.declarations.push(declaration);
        Ok(())
    }

    pub fn extend(&mut self, declarations: impl IntoIterator<Item = Declaration>) -> Result<()> {
        declarations.into_iter().try_for_each(|d| self.add(d))
    }

    /// Find a declaration by name. An empty name never matches.
    pub fn lookup(&self, name: &str) -> Option<&Declaration> {
        if name.is_empty() {
            return None;
        }
        self.declarations.iter().find(|d| d.name() == name)
    }

    /// Model-facing tool list, in registration order.
    pub fn to_tools(&self) -> Vec<ToolDefinition> {
        self.declarations.iter().map(Declaration::to_tool).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
