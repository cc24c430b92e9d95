//! Agentic: provider-agnostic function calling for LLMs.
//!
//! Declare functions, hand them to an [`Engine`](engine::Engine) together
//! with a [`ModelCaller`](caller::ModelCaller), and the engine drives the
//! "ask the model, run the requested tools, feed results back" loop until
//! the model answers. [`Agent`](agent::Agent)s wrap that loop behind a
//! persona and can be nested: every child agent shows up in its parent as a
//! single `call_<name>` tool.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use agentic::prelude::*;
//!
//! # async fn example(caller: Arc<dyn ModelCaller>) -> agentic::error::Result<()> {
//! let mut engine = Engine::new(caller, EngineOptions::builder().model("gpt-4o").build());
//! engine.add_declaration(Declaration::new(
//!     "get_time",
//!     "Current time as an RFC 3339 string",
//!     None,
//!     |_args, _ctx| async {
//!         let mut out = ToolOutput::new();
//!         out.insert("time".into(), "2024-01-01T00:00:00Z".into());
//!         Ok(out)
//!     },
//! ))?;
//!
//! let mut state = ConversationState::new(vec![Message::user("What time is it?")]);
//! let response = engine.run(&mut state).await?;
//! println!("{}", response.message.content);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod caller;
pub mod config;
pub mod engine;
pub mod error;
pub mod mcp;
pub mod prelude;
pub mod schema;
pub mod state;
pub mod tools;
pub mod types;
pub mod util;
