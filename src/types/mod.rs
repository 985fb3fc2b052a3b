mod error;
mod message;
mod result;
mod state;

pub use error::{GraphError, NodeError};
pub use message::{Message, MessageType, MessagesState, MessagesStateUpdate};
pub use result::{GraphResult, NodeOutput, NodeResult};
pub use state::GraphState;
