use async_trait::async_trait;
use mockall::mock;
use routegraph::completion::*;
use routegraph::config::ModelSettings;
use routegraph::prelude::*;
use routegraph::workflows::router::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mock! {
    pub Client {}
    #[async_trait]
    impl ChatClient for Client {
        async fn complete(
            &self,
            messages: Vec<Message>,
            options: ChatCompletionRequestOptions,
            call_options: Option<ChatCompletionCallOptions>,
        ) -> CompletionResult<Completion>;

        async fn complete_stream(
            &self,
            messages: Vec<Message>,
            options: ChatCompletionRequestOptions,
            call_options: Option<ChatCompletionCallOptions>,
        ) -> CompletionResult<CompletionStream>;
    }
}

const SMALL_QUERY: &str = "Quick: what is RAG?";
const BIG_QUERY: &str =
    "Explain how to design a production-grade RAG system with LangChain and LangGraph.";

fn scripted_graph() -> (
    Arc<ScriptedChatClient>,
    Arc<ScriptedChatClient>,
    Graph<RouterState, Built>,
) {
    let small = Arc::new(ScriptedChatClient::new("RAG grounds answers in retrieved documents."));
    let big = Arc::new(ScriptedChatClient::new("A production RAG system has five parts..."));
    let graph = router_graph(
        AnswerNode::small(small.clone(), ChatCompletionRequestOptions::new("gpt-4o-mini", 0.0)),
        AnswerNode::big(big.clone(), ChatCompletionRequestOptions::new("gpt-4o", 0.4)),
    )
    .unwrap();
    (small, big, graph)
}

#[tokio::test]
async fn test_quick_query_takes_small_path() {
    let (small, big, graph) = scripted_graph();

    let result = graph.invoke(RouterState::new(SMALL_QUERY)).await.unwrap();

    assert_eq!(result.query, SMALL_QUERY);
    assert_eq!(result.answer, "RAG grounds answers in retrieved documents.");
    assert_eq!(small.call_count(), 1);
    assert_eq!(big.call_count(), 0);
    assert_eq!(
        small.calls()[0].prompt(),
        Some("Answer in 1-2 sentences: Quick: what is RAG?")
    );
}

#[tokio::test]
async fn test_long_query_takes_big_path() {
    let (small, big, graph) = scripted_graph();
    let query = format!("{:.<120}", "Describe the tradeoffs between vector stores");
    assert_eq!(query.chars().count(), 120);

    let result = graph.invoke(RouterState::new(query.clone())).await.unwrap();

    assert!(!result.answer.is_empty());
    assert_eq!(small.call_count(), 0);
    assert_eq!(big.call_count(), 1);
    assert_eq!(
        big.calls()[0].prompt().map(str::to_string),
        Some(format!(
            "Give a detailed but clear answer (4-6 paragraphs): {}",
            query
        ))
    );
}

#[tokio::test]
async fn test_quick_keyword_wins_over_length() {
    let (small, big, graph) = scripted_graph();
    let query = format!("{} -- keep it QUICK", "context ".repeat(20));

    graph.invoke(RouterState::new(query)).await.unwrap();

    assert_eq!(small.call_count(), 1);
    assert_eq!(big.call_count(), 0);
}

#[tokio::test]
async fn test_missing_path_entry_is_configuration_error() {
    let small = Arc::new(ScriptedChatClient::new("small"));
    let big = Arc::new(ScriptedChatClient::new("big"));

    let mut graph = Graph::new("partial_router");
    graph
        .add_router(ROUTER_NODE, route, [(Route::Small, "small")])
        .add_node(AnswerNode::small(small.clone(), Default::default()))
        .add_node(AnswerNode::big(big.clone(), Default::default()))
        .set_entry_point(ROUTER_NODE)
        .set_finish_point("small")
        .set_finish_point("big");
    let graph = graph.build().unwrap();

    let err = graph.invoke(RouterState::new(BIG_QUERY)).await.unwrap_err();

    assert!(err.is_configuration());
    match err {
        GraphError::UnmappedRoute { node, key } => {
            assert_eq!(node, ROUTER_NODE);
            assert_eq!(key, "big");
        }
        other => panic!("expected UnmappedRoute, got {:?}", other),
    }
    assert_eq!(small.call_count(), 0);
    assert_eq!(big.call_count(), 0);
}

#[tokio::test]
async fn test_router_runs_once_per_request() {
    let decisions = Arc::new(AtomicUsize::new(0));
    let counter = decisions.clone();
    let client = Arc::new(ScriptedChatClient::new("ok"));

    let mut graph = Graph::new("counting_router");
    graph
        .add_router(
            ROUTER_NODE,
            move |state: &RouterState| {
                counter.fetch_add(1, Ordering::SeqCst);
                route(state)
            },
            [(Route::Small, "small"), (Route::Big, "big")],
        )
        .add_node(AnswerNode::small(client.clone(), Default::default()))
        .add_node(AnswerNode::big(client.clone(), Default::default()))
        .set_entry_point(ROUTER_NODE)
        .set_finish_point("small")
        .set_finish_point("big");
    let graph = graph.build().unwrap();

    graph.invoke(RouterState::new(SMALL_QUERY)).await.unwrap();
    assert_eq!(decisions.load(Ordering::SeqCst), 1);
    assert_eq!(client.call_count(), 1);

    graph.invoke(RouterState::new(BIG_QUERY)).await.unwrap();
    assert_eq!(decisions.load(Ordering::SeqCst), 2);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_routing_is_idempotent() {
    let state = RouterState::new(BIG_QUERY);
    assert_eq!(route(&state), route(&state));
    assert_eq!(route(&state), Route::Big);
    assert_eq!(classify(SMALL_QUERY), classify(SMALL_QUERY));
}

#[tokio::test]
async fn test_profiles_reach_the_model() {
    let mut client = MockClient::new();
    client
        .expect_complete()
        .withf(|messages, options, call_options| {
            messages.len() == 1
                && messages[0].content.starts_with("Give a detailed but clear answer")
                && options.model == "gpt-4o"
                && options.temperature == Some(0.4)
                && call_options.is_some()
        })
        .times(1)
        .returning(|_, options, _| Ok(Completion::text(options.model, "detailed answer")));
    client.expect_complete_stream().never();

    let graph = router_graph_with(Arc::new(client), &ModelSettings::default()).unwrap();
    let result = graph.invoke(RouterState::new(BIG_QUERY)).await.unwrap();

    assert_eq!(result.answer, "detailed answer");
}

#[tokio::test]
async fn test_model_failure_propagates() {
    let client = Arc::new(ScriptedChatClient::failing("rate limited"));
    let graph = router_graph_with(client.clone(), &ModelSettings::default()).unwrap();

    let err = graph.invoke(RouterState::new(SMALL_QUERY)).await.unwrap_err();

    assert!(!err.is_configuration());
    assert!(matches!(err, GraphError::Node(NodeError::Model(_))));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_demo_queries_with_default_profiles() {
    let client = Arc::new(ScriptedChatClient::echo());
    let graph = router_graph_with(client.clone(), &ModelSettings::default()).unwrap();

    let a1 = graph.invoke(RouterState::new(SMALL_QUERY)).await.unwrap();
    let a2 = graph.invoke(RouterState::new(BIG_QUERY)).await.unwrap();

    assert!(a1.answer.starts_with("[gpt-4o-mini] Answer in 1-2 sentences:"));
    assert!(a2.answer.starts_with("[gpt-4o] Give a detailed but clear answer"));
    assert_eq!(client.call_count(), 2);
}

#[test]
fn test_router_path_to_end_is_rejected() {
    let client = Arc::new(ScriptedChatClient::new("unused"));

    let mut graph = Graph::new("router_skipping_big");
    graph
        .add_router(ROUTER_NODE, route, [(Route::Small, "small"), (Route::Big, END)])
        .add_node(AnswerNode::small(client.clone(), Default::default()))
        .set_entry_point(ROUTER_NODE)
        .set_finish_point("small");

    let err = graph.build().unwrap_err();

    assert!(err.is_configuration());
    assert!(matches!(err, GraphError::InvalidTransition(_)));
    assert_eq!(client.call_count(), 0);
}
