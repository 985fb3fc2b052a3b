use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::{Branch, Built, Condition, Edge, NotBuilt};
use crate::node::{Context, Node};
use crate::types::{GraphError, GraphResult, GraphState, NodeError, NodeOutput, NodeResult};

pub const START: &str = "__start__";
pub const END: &str = "__end__";

const DEFAULT_RECURSION_LIMIT: usize = 25;

/// A graph that executes nodes in a defined order
#[derive(Debug)]
pub struct Graph<S, BuildState = NotBuilt>
where
    S: GraphState,
{
    graph_name: String,
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    routers: HashMap<String, Branch<S>>,
    edges: HashMap<String, Edge<S>>,
    recursion_limit: usize,
    build_state: BuildState,
}

impl<S> Graph<S, NotBuilt>
where
    S: GraphState,
{
    /// Create a new graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            graph_name: name.into(),
            nodes: HashMap::new(),
            routers: HashMap::new(),
            edges: HashMap::new(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            build_state: NotBuilt::default(),
        }
    }

    fn register_name(&mut self, name: &str) {
        if self.nodes.contains_key(name) || self.routers.contains_key(name) {
            self.build_state.duplicate_nodes.push(name.to_string());
        }
    }

    fn insert_edge(&mut self, from: String, edge: Edge<S>) {
        if self.edges.contains_key(&from) {
            self.build_state.duplicate_edges.push(from.clone());
        }
        self.edges.insert(from, edge);
    }

    /// Add a node to the graph
    pub fn add_node<N>(&mut self, node: N) -> &mut Self
    where
        N: Node<S> + 'static,
    {
        let name = node.name().to_string();
        self.register_name(&name);
        self.nodes.insert(name, Arc::new(node));
        self
    }

    /// Add a router: a node that leaves the state untouched and picks the
    /// next node by mapping the condition's key through `path_map`.
    pub fn add_router<K, F, I, N>(
        &mut self,
        name: impl Into<String>,
        condition: F,
        path_map: I,
    ) -> &mut Self
    where
        K: Into<String> + 'static,
        F: Fn(&S) -> K + Send + Sync + 'static,
        I: IntoIterator<Item = (K, N)>,
        N: Into<String>,
    {
        let name = name.into();
        self.register_name(&name);
        let branch = Branch::with_path_map(erase(condition), collect_path_map(path_map));
        self.routers.insert(name, branch);
        self
    }

    /// Add a direct edge between nodes
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.insert_edge(from.into(), Edge::Direct(to.into()));
        self
    }

    /// Shorthand for an edge from `START`
    pub fn set_entry_point(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_edge(START, name)
    }

    /// Shorthand for an edge to `END`
    pub fn set_finish_point(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_edge(name, END)
    }

    /// Add a conditional edge from a node; the condition returns the next
    /// node's name.
    pub fn add_conditional_edge<F>(&mut self, from: impl Into<String>, condition: F) -> &mut Self
    where
        F: Fn(&S) -> String + Send + Sync + 'static,
    {
        self.insert_edge(from.into(), Edge::Conditional(Branch::new(Arc::new(condition))));
        self
    }

    /// Add a conditional edge from a node; the condition's key is looked up
    /// in `path_map`.
    pub fn add_conditional_edges<K, F, I, N>(
        &mut self,
        from: impl Into<String>,
        condition: F,
        path_map: I,
    ) -> &mut Self
    where
        K: Into<String> + 'static,
        F: Fn(&S) -> K + Send + Sync + 'static,
        I: IntoIterator<Item = (K, N)>,
        N: Into<String>,
    {
        let branch = Branch::with_path_map(erase(condition), collect_path_map(path_map));
        self.insert_edge(from.into(), Edge::Conditional(branch));
        self
    }

    /// Cap on node visits per run
    pub fn with_recursion_limit(&mut self, limit: usize) -> &mut Self {
        self.recursion_limit = limit;
        self
    }

    /// Validate the graph structure and make it ready for execution
    pub fn build(self) -> GraphResult<Graph<S, Built>> {
        if let Some(name) = self.build_state.duplicate_nodes.first() {
            return Err(GraphError::DuplicateNode(name.clone()));
        }
        if let Some(from) = self.build_state.duplicate_edges.first() {
            return Err(GraphError::DuplicateEdge(from.clone()));
        }
        if !self.edges.contains_key(START) {
            return Err(GraphError::MissingEntryPoint);
        }

        for (from, edge) in &self.edges {
            if from == END {
                return Err(GraphError::InvalidTransition(
                    "END cannot have outgoing edges".into(),
                ));
            }
            if self.routers.contains_key(from) {
                return Err(GraphError::InvalidTransition(format!(
                    "Router {} cannot have its own edges",
                    from
                )));
            }
            if from != START && !self.nodes.contains_key(from) {
                return Err(GraphError::NodeNotFound(from.clone()));
            }
            // Entry edges and router paths must reach a handler.
            let allow_end = from != START;
            match edge {
                Edge::Direct(to) => self.check_target(from, to, allow_end)?,
                Edge::Conditional(branch) => {
                    for to in branch.destinations() {
                        self.check_target(from, to, allow_end)?;
                    }
                }
            }
        }

        for (name, router) in &self.routers {
            for to in router.destinations() {
                self.check_target(name, to, false)?;
            }
        }

        if let Some(name) = self.nodes.keys().find(|n| !self.edges.contains_key(*n)) {
            return Err(GraphError::InvalidTransition(format!(
                "No transition defined from node: {}",
                name
            )));
        }

        Ok(Graph {
            graph_name: self.graph_name,
            nodes: self.nodes,
            routers: self.routers,
            edges: self.edges,
            recursion_limit: self.recursion_limit,
            build_state: Built,
        })
    }

    fn check_target(&self, from: &str, to: &str, allow_end: bool) -> GraphResult<()> {
        if to == START {
            return Err(GraphError::InvalidTransition(
                "Edges cannot lead back to START".into(),
            ));
        }
        if to == END {
            return if allow_end {
                Ok(())
            } else {
                Err(GraphError::InvalidTransition(format!(
                    "{} cannot lead straight to END",
                    from
                )))
            };
        }
        if self.nodes.contains_key(to) || self.routers.contains_key(to) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(to.to_string()))
        }
    }
}

impl<S> Graph<S, Built>
where
    S: GraphState,
{
    pub fn name(&self) -> &str {
        &self.graph_name
    }

    /// Run the graph with a fresh context
    pub async fn invoke(&self, initial_state: S) -> GraphResult<S> {
        self.run(&Context::default(), initial_state).await
    }

    /// Run the graph with an initial state
    pub async fn run(&self, ctx: &Context, initial_state: S) -> GraphResult<S> {
        let mut current_state = initial_state;
        let mut current_node = self.next_node(START, &current_state)?;
        if current_node == END {
            return Err(GraphError::InvalidTransition(
                "START cannot lead straight to END".into(),
            ));
        }
        let mut steps = 0;

        while current_node != END {
            if steps >= self.recursion_limit {
                return Err(GraphError::RecursionLimit(self.recursion_limit));
            }
            steps += 1;

            // Routers only choose the successor
            if let Some(router) = self.routers.get(&current_node) {
                let next_node = router.resolve(&current_node, &current_state)?;
                debug!(graph = %self.graph_name, router = %current_node, next = %next_node, "routed");
                current_node = next_node;
                continue;
            }

            let node = self
                .nodes
                .get(&current_node)
                .ok_or_else(|| GraphError::NodeNotFound(current_node.clone()))?;

            debug!(graph = %self.graph_name, node = %current_node, step = steps, "running node");
            let node_ctx = ctx.child().with_metadata("node", current_node.clone());

            let output = node.process(&node_ctx, current_state.clone()).await?;
            current_state = output.apply_to(current_state);

            current_node = self.next_node(&current_node, &current_state)?;
        }

        debug!(graph = %self.graph_name, steps, "graph finished");
        Ok(current_state)
    }

    fn next_node(&self, from: &str, state: &S) -> GraphResult<String> {
        match self.edges.get(from) {
            Some(Edge::Direct(next)) => Ok(next.clone()),
            Some(Edge::Conditional(branch)) => branch.resolve(from, state),
            None if from == START => Err(GraphError::MissingEntryPoint),
            None => Err(GraphError::InvalidTransition(format!(
                "No transition defined from node: {}",
                from
            ))),
        }
    }
}

#[async_trait]
impl<S> Node<S> for Graph<S, Built>
where
    S: GraphState,
{
    async fn process(&self, ctx: &Context, state: S) -> NodeResult<S> {
        let new_state = self
            .run(ctx, state)
            .await
            .map_err(|e| NodeError::SubgraphExecution(e.to_string()))?;
        Ok(NodeOutput::Full(new_state))
    }

    fn name(&self) -> &str {
        &self.graph_name
    }
}

fn erase<S, K, F>(condition: F) -> Condition<S>
where
    S: 'static,
    K: Into<String> + 'static,
    F: Fn(&S) -> K + Send + Sync + 'static,
{
    Arc::new(move |state: &S| condition(state).into())
}

fn collect_path_map<K, I, N>(path_map: I) -> HashMap<String, String>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, N)>,
    N: Into<String>,
{
    path_map
        .into_iter()
        .map(|(key, node)| (key.into(), node.into()))
        .collect()
}
