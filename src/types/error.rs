use crate::completion::CompletionError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for node operations
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum NodeError {
    #[error("Node execution: {0}")]
    Execution(String),

    #[error("Model: {0}")]
    Model(String),

    #[error("Subgraph execution: {0}")]
    SubgraphExecution(String),

    #[error("Other: {0}")]
    Other(String),
}

impl From<anyhow::Error> for NodeError {
    fn from(err: anyhow::Error) -> Self {
        NodeError::Other(err.to_string())
    }
}

impl From<CompletionError> for NodeError {
    fn from(err: CompletionError) -> Self {
        NodeError::Model(err.to_string())
    }
}

/// Error type for overall graph operations
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Duplicate node: {0}")]
    DuplicateNode(String),

    #[error("Duplicate edge from: {0}")]
    DuplicateEdge(String),

    #[error("Graph has no entry point")]
    MissingEntryPoint,

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Router {node} returned unmapped key: {key}")]
    UnmappedRoute { node: String, key: String },

    #[error("Recursion limit of {0} steps reached without hitting END")]
    RecursionLimit(usize),

    // NodeError can bubble up automatically
    #[error(transparent)]
    Node(#[from] NodeError),

    // Catch-all for other errors like anyhow
    #[error("Other: {0}")]
    Other(String),
}

impl GraphError {
    /// True when the error comes from how the graph was wired rather than
    /// from a node failing.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GraphError::NodeNotFound(_)
                | GraphError::DuplicateNode(_)
                | GraphError::DuplicateEdge(_)
                | GraphError::MissingEntryPoint
                | GraphError::InvalidTransition(_)
                | GraphError::UnmappedRoute { .. }
        )
    }
}

impl From<anyhow::Error> for GraphError {
    fn from(err: anyhow::Error) -> Self {
        GraphError::Other(err.to_string())
    }
}
