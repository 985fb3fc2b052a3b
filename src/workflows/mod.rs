//! Ready-made graphs.

pub mod chat;
pub mod router;

pub use chat::{chat_graph, ChatNode};
pub use router::{
    classify, route, router_graph, router_graph_with, AnswerNode, AnswerStyle, Route,
    RouterState, RouterStateUpdate,
};
