//! Trait for struct-based tools.

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::declaration::{ToolExecutionContext, ToolOutput};
use crate::error::AgenticError;
use crate::schema::Schema;

/// Implement to expose a type as a tool; register it with
/// [`Declaration::from_tool`](super::Declaration::from_tool).
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Argument schema; `None` for tools without arguments.
    fn schema(&self) -> Option<Schema>;

    /// Execute the tool with decoded arguments.
    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<ToolOutput, AgenticError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use crate::tools::Declaration;
    use serde_json::json;

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercase a string"
        }

        fn schema(&self) -> Option<Schema> {
            Some(SchemaBuilder::new().string("text", "Input", true).build())
        }

        async fn execute(
            &self,
            args: &ToolArguments,
            ctx: &ToolExecutionContext,
        ) -> Result<ToolOutput, AgenticError> {
            let mut out = ToolOutput::new();
            out.insert("text".into(), json!(args.get_str("text")?.to_uppercase()));
            out.insert("call".into(), json!(ctx.tool_call_id));
            Ok(out)
        }
    }

    #[tokio::test]
    async fn tool_impl_becomes_declaration() {
        let decl = Declaration::from_tool(Upper);
        assert_eq!(decl.name(), "upper");
        assert!(decl.schema().is_some_and(|s| s.is_required("text")));

        let mut ctx = ToolExecutionContext::detached("upper");
        ctx.tool_call_id = "call-9".into();
        let out = decl
            .execute(ToolArguments::new(json!({"text": "abc"})), ctx)
            .await
            .unwrap();

        assert_eq!(out["text"], json!("ABC"));
        assert_eq!(out["call"], json!("call-9"));
    }
}
