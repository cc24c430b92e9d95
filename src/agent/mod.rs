//! Agents and recursive sub-agent dispatch.

pub mod agent;
mod context;
pub mod dispatch;
pub mod options;

pub use agent::Agent;
pub use dispatch::DispatchArguments;
pub use options::AgentOptions;
