use crate::{GraphError, GraphState, NodeError};

/// What a node hands back to the executor.
#[derive(PartialEq, Debug)]
pub enum NodeOutput<S>
where
    S: GraphState,
{
    /// Replaces the state outright
    Full(S),

    /// Applied to the incoming state in order; empty leaves it unchanged.
    Updates(Vec<S::Update>),
}

impl<S> NodeOutput<S>
where
    S: GraphState,
{
    /// Output that leaves the state as it was.
    pub fn unchanged() -> Self {
        NodeOutput::Updates(Vec::new())
    }

    /// The state after this output, given the state the node was handed.
    pub fn apply_to(self, mut state: S) -> S {
        match self {
            NodeOutput::Full(new_state) => new_state,
            NodeOutput::Updates(updates) => {
                state.apply_many(updates);
                state
            }
        }
    }
}

pub type NodeResult<S> = Result<NodeOutput<S>, NodeError>;

pub type GraphResult<T> = Result<T, GraphError>;
