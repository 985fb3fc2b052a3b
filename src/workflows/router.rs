//! Answer a query through a small or a big model depending on how it is phrased.
//!
//! ```text
//! START -> router --small--> small -> END
//!                 \--big---> big   -> END
//! ```

use crate::completion::{ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions};
use crate::config::ModelSettings;
use crate::{Built, Context, Graph, GraphResult, Message, Node, NodeOutput, NodeResult};
use async_trait::async_trait;
use routegraph_macros::State;
use std::fmt;
use std::sync::Arc;

pub const ROUTER_NODE: &str = "router";

const QUICK_KEYWORD: &str = "quick";
const SHORT_QUERY_CHARS: usize = 60;

/// A request flowing through the router graph.
#[derive(State, Debug, Clone, Default, PartialEq)]
pub struct RouterState {
    pub query: String,
    pub answer: String,
}

impl RouterState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            answer: String::new(),
        }
    }
}

/// Path keys of the router node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Small,
    Big,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Small => "small",
            Route::Big => "big",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.as_str().to_string()
    }
}

/// `Small` for queries mentioning "quick" or shorter than 60 characters.
pub fn classify(query: &str) -> Route {
    let query = query.to_lowercase();
    if query.contains(QUICK_KEYWORD) || query.chars().count() < SHORT_QUERY_CHARS {
        Route::Small
    } else {
        Route::Big
    }
}

pub fn route(state: &RouterState) -> Route {
    classify(&state.query)
}

/// How an `AnswerNode` phrases its prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStyle {
    Brief,
    Detailed,
}

impl AnswerStyle {
    pub fn prompt(&self, query: &str) -> String {
        match self {
            AnswerStyle::Brief => format!("Answer in 1-2 sentences: {}", query),
            AnswerStyle::Detailed => format!(
                "Give a detailed but clear answer (4-6 paragraphs): {}",
                query
            ),
        }
    }
}

/// Handler that fills `answer` with one model call. Model errors propagate.
pub struct AnswerNode {
    name: String,
    style: AnswerStyle,
    client: Arc<dyn ChatClient>,
    options: ChatCompletionRequestOptions,
}

impl AnswerNode {
    pub fn new(
        name: impl Into<String>,
        style: AnswerStyle,
        client: Arc<dyn ChatClient>,
        options: ChatCompletionRequestOptions,
    ) -> Self {
        Self {
            name: name.into(),
            style,
            client,
            options,
        }
    }

    pub fn small(client: Arc<dyn ChatClient>, options: ChatCompletionRequestOptions) -> Self {
        Self::new(Route::Small.as_str(), AnswerStyle::Brief, client, options)
    }

    pub fn big(client: Arc<dyn ChatClient>, options: ChatCompletionRequestOptions) -> Self {
        Self::new(Route::Big.as_str(), AnswerStyle::Detailed, client, options)
    }
}

impl fmt::Debug for AnswerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerNode")
            .field("name", &self.name)
            .field("style", &self.style)
            .field("options", &self.options)
            .finish()
    }
}

#[async_trait]
impl Node<RouterState> for AnswerNode {
    async fn process(&self, ctx: &Context, state: RouterState) -> NodeResult<RouterState> {
        let prompt = self.style.prompt(&state.query);
        let completion = self
            .client
            .complete(
                vec![Message::human(prompt)],
                self.options.clone(),
                Some(ChatCompletionCallOptions::from(ctx)),
            )
            .await?;

        Ok(NodeOutput::Updates(vec![RouterStateUpdate::Answer(
            completion.content,
        )]))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wire the router graph from its two handlers.
pub fn router_graph(small: AnswerNode, big: AnswerNode) -> GraphResult<Graph<RouterState, Built>> {
    let small_name = small.name().to_string();
    let big_name = big.name().to_string();

    let mut graph = Graph::new("router_graph");
    graph
        .add_router(
            ROUTER_NODE,
            route,
            [(Route::Small, small_name.clone()), (Route::Big, big_name.clone())],
        )
        .add_node(small)
        .add_node(big)
        .set_entry_point(ROUTER_NODE)
        .set_finish_point(small_name)
        .set_finish_point(big_name);
    graph.build()
}

/// Router graph with both handlers on one client, using the small and big
/// profiles from `models`.
pub fn router_graph_with(
    client: Arc<dyn ChatClient>,
    models: &ModelSettings,
) -> GraphResult<Graph<RouterState, Built>> {
    router_graph(
        AnswerNode::small(client.clone(), (&models.small).into()),
        AnswerNode::big(client, (&models.big).into()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_quick_keyword() {
        assert_eq!(classify("Quick: what is RAG?"), Route::Small);
        let long_quick = format!("{} QUICK", "x".repeat(100));
        assert_eq!(classify(&long_quick), Route::Small);
    }

    #[test]
    fn test_classify_length_boundary() {
        assert_eq!(classify(&"a".repeat(59)), Route::Small);
        assert_eq!(classify(&"a".repeat(60)), Route::Big);
        assert_eq!(classify(""), Route::Small);
    }

    #[test]
    fn test_classify_counts_characters_not_bytes() {
        // 30 two-byte characters: 60 bytes but only 30 characters
        assert_eq!(classify(&"é".repeat(30)), Route::Small);
    }

    #[test]
    fn test_route_display() {
        assert_eq!(Route::Small.to_string(), "small");
        assert_eq!(String::from(Route::Big), "big");
    }

    #[test]
    fn test_prompts() {
        assert_eq!(
            AnswerStyle::Brief.prompt("what is RAG?"),
            "Answer in 1-2 sentences: what is RAG?"
        );
        assert!(AnswerStyle::Detailed
            .prompt("design RAG")
            .starts_with("Give a detailed but clear answer (4-6 paragraphs)"));
    }
}
