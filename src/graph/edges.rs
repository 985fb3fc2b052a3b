use crate::types::{GraphError, GraphResult};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result};
use std::sync::Arc;

/// Represents a condition for edge transitions
pub type Condition<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// A data-dependent transition: a condition plus an optional map from the
/// key it returns to the destination node.
///
/// Without a path map the condition's key is taken as the node name itself.
pub struct Branch<S> {
    condition: Condition<S>,
    path_map: Option<HashMap<String, String>>,
}

impl<S> Branch<S> {
    pub fn new(condition: Condition<S>) -> Self {
        Self {
            condition,
            path_map: None,
        }
    }

    pub fn with_path_map(condition: Condition<S>, path_map: HashMap<String, String>) -> Self {
        Self {
            condition,
            path_map: Some(path_map),
        }
    }

    /// Evaluate the condition and return the raw key.
    pub fn key(&self, state: &S) -> String {
        (self.condition)(state)
    }

    /// Evaluate the condition and resolve it to the next node name.
    pub fn resolve(&self, from: &str, state: &S) -> GraphResult<String> {
        let key = self.key(state);
        match &self.path_map {
            None => Ok(key),
            Some(map) => map.get(&key).cloned().ok_or_else(|| {
                tracing::warn!(node = %from, key = %key, "route key missing from path map");
                GraphError::UnmappedRoute {
                    node: from.to_string(),
                    key,
                }
            }),
        }
    }

    /// Statically known destinations, if the branch has a path map.
    pub fn destinations(&self) -> impl Iterator<Item = &String> {
        self.path_map.iter().flat_map(|map| map.values())
    }
}

impl<S> Clone for Branch<S> {
    fn clone(&self) -> Self {
        Self {
            condition: self.condition.clone(),
            path_map: self.path_map.clone(),
        }
    }
}

impl<S> Debug for Branch<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Branch")
            .field("condition", &"<condition>")
            .field("path_map", &self.path_map)
            .finish()
    }
}

/// Edge definition for graph transitions
pub enum Edge<S> {
    /// Direct edge to next node
    Direct(String),
    /// Conditional edge based on state
    Conditional(Branch<S>),
}

impl<S> Clone for Edge<S> {
    fn clone(&self) -> Self {
        match self {
            Edge::Direct(target) => Edge::Direct(target.clone()),
            Edge::Conditional(branch) => Edge::Conditional(branch.clone()),
        }
    }
}

// Manual Debug implementation
impl<S> Debug for Edge<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Edge::Direct(target) => f.debug_tuple("Direct").field(target).finish(),
            Edge::Conditional(branch) => f.debug_tuple("Conditional").field(branch).finish(),
        }
    }
}
