mod core;
mod edges;
mod marker;

pub use self::core::{Graph, END, START};
pub use edges::{Branch, Condition, Edge};
pub use marker::{Built, NotBuilt};
