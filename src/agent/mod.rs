//! Role-playing agents working through tasks one after another.

mod core;
mod crew;
mod task;

pub use self::core::Agent;
pub use crew::{Crew, CrewError, CrewOutput, CrewResult, CrewState, CrewStateUpdate};
pub use task::{Task, TaskOutput};
