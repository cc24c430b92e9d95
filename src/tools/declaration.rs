//! Declarations and the context handed to their implementations.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::arguments::ToolArguments;
use super::tool::Tool;
use crate::caller::ToolDefinition;
use crate::error::{AgenticError, Result};
use crate::schema::{schema_for, ArgumentShape, Schema};
use crate::state::StateHooks;
use crate::types::Message;

/// Ordered mapping returned by a declaration implementation.
pub type ToolOutput = Map<String, Value>;

type DeclarationHandler =
    dyn Fn(ToolArguments, ToolExecutionContext) -> BoxFuture<'static, Result<ToolOutput>> + Send + Sync;

type ArgumentCheck = dyn Fn(&ToolArguments) -> Result<()> + Send + Sync;

/// Context available during tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionContext {
    pub tool_call_id: String,
    pub tool_name: String,
    /// Hooks of the state that issued this call.
    pub hooks: StateHooks,
    /// Messages visible to the issuing state when the call was made.
    pub history: Vec<Message>,
    pub cancel: CancellationToken,
}

impl ToolExecutionContext {
    /// A context not attached to any run, for invoking a declaration directly.
    pub fn detached(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            ..Default::default()
        }
    }
}

/// A named callable exposed to the model as a tool.
#[derive(Clone)]
pub struct Declaration {
    name: String,
    description: String,
    schema: Option<Schema>,
    terminator: bool,
    handler: Arc<DeclarationHandler>,
    check: Option<Arc<ArgumentCheck>>,
}

impl Declaration {
    /// Create a declaration from a closure over decoded arguments.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Option<Schema>,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            terminator: false,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
            check: None,
        }
    }

    /// Create a declaration whose argument schema is derived from `A`.
    ///
    /// Arguments are deserialized into `A` before the handler runs and the
    /// handler's return value must serialize to a JSON object.
    pub fn typed<A, R, F, Fut>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        A: ArgumentShape + DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        F: Fn(A, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        let schema = schema_for::<A>();
        let takes_arguments = schema.is_some();
        let handler = Arc::new(handler);
        let mut declaration = Self::new(name, description, schema, move |args, ctx| {
            let handler = Arc::clone(&handler);
            async move {
                let args: A = typed_arguments(args, takes_arguments).deserialize()?;
                let output = handler(args, ctx).await?;
                into_tool_output(serde_json::to_value(output)?)
            }
        });
        declaration.check = Some(Arc::new(move |args: &ToolArguments| {
            typed_arguments(args.clone(), takes_arguments)
                .deserialize::<A>()
                .map(drop)
        }));
        declaration
    }

    /// Wrap a [`Tool`] implementation.
    pub fn from_tool<T: Tool + 'static>(tool: T) -> Self {
        let tool = Arc::new(tool);
        let name = tool.name().to_string();
        let description = tool.description().to_string();
        let schema = tool.schema();
        Self::new(name, description, schema, move |args, ctx| {
            let tool = Arc::clone(&tool);
            async move { tool.execute(&args, &ctx).await }
        })
    }

    /// Mark this declaration as ending the run once it succeeds.
    pub fn with_terminator(mut self, terminator: bool) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn is_terminator(&self) -> bool {
        self.terminator
    }

    /// Check that `args` decode into the declaration's argument type.
    /// Declarations built from a closure over raw arguments accept anything.
    pub fn check_arguments(&self, args: &ToolArguments) -> Result<()> {
        match &self.check {
            Some(check) => check(args),
            None => Ok(()),
        }
    }

    /// Run the implementation.
    pub async fn execute(&self, args: ToolArguments, ctx: ToolExecutionContext) -> Result<ToolOutput> {
        (self.handler)(args, ctx).await
    }

    /// Model-facing projection of this declaration.
    pub fn to_tool(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.schema.clone(),
        }
    }
}

impl std::fmt::Debug for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Declaration")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("terminator", &self.terminator)
            .finish()
    }
}

fn typed_arguments(args: ToolArguments, takes_arguments: bool) -> ToolArguments {
    if takes_arguments {
        args
    } else {
        ToolArguments::new(Value::Null)
    }
}

fn into_tool_output(value: Value) -> Result<ToolOutput> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AgenticError::Serialization(
            <serde_json::Error as serde::ser::Error>::custom(format!(
                "result must serialize to an object, got {other}"
            )),
        )),
    }
}
