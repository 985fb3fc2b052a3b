//! RouteGraph runs LLM calls as small stateful graphs: a router node picks a
//! path, handler nodes call a chat model, and the executor walks the edges
//! until it reaches `END`.

// Lets `#[derive(State)]` name this crate as `::routegraph` from inside it.
#![allow(unused_extern_crates)]
extern crate self as routegraph;

pub mod agent;
pub mod completion;
pub mod config;
pub mod graph;
pub mod node;
pub mod types;
pub mod workflows;

pub use routegraph_macros::State;

pub mod prelude {
    //! Convenient re-exports of commonly used types
    pub use crate::agent::{Agent, Crew, CrewError, CrewOutput, CrewResult, Task, TaskOutput};
    pub use crate::completion::{
        ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions, Completion,
        CompletionError, CompletionResult, CompletionStream, LangSmithTracer, OpenAIChatClient,
        ScriptedChatClient, TracedChatClient, TracingError, TracingProvider,
    };
    pub use crate::config::{ConfigError, Settings};
    pub use crate::graph::{Branch, Built, Condition, Edge, Graph, NotBuilt, END, START};
    pub use crate::node::{Context, FunctionNode, Node};
    pub use crate::types::{
        GraphError, GraphResult, GraphState, Message, MessageType, MessagesState,
        MessagesStateUpdate, NodeError, NodeOutput, NodeResult,
    };
}

// Re-export main types
pub use prelude::*;
