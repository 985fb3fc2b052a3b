mod context;
mod core;
mod function;

pub use context::Context;
pub use self::core::Node;
pub use function::FunctionNode;
