use crate::{Context, GraphState, NodeResult};
use async_trait::async_trait;
use std::fmt::Debug;

/// A named step of a graph.
///
/// `process` receives its own copy of the state and reports the result as a
/// `NodeOutput`; the executor applies it before choosing the next node. Errors
/// end the run.
#[async_trait]
pub trait Node<S>: Send + Sync + Debug
where
    S: GraphState,
{
    async fn process(&self, ctx: &Context, state: S) -> NodeResult<S>;

    /// Key the node is registered under. Must be unique within a graph.
    fn name(&self) -> &str;
}
