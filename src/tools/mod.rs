//! Declarations: named callables the model can invoke as tools.

pub mod arguments;
pub mod declaration;
pub mod registry;
pub mod tool;
pub mod validation;

pub use arguments::ToolArguments;
pub use declaration::{Declaration, ToolExecutionContext, ToolOutput};
pub use registry::DeclarationRegistry;
pub use tool::Tool;
pub use validation::validate_arguments;
