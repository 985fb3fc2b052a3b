use async_trait::async_trait;
use mockall::mock;
use mockall::Sequence;
use routegraph::completion::*;
use routegraph::prelude::*;
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

#[tokio::test]
async fn test_researcher_then_writer() {
    let mut client = MockClient::new();
    let mut seq = Sequence::new();

    client
        .expect_complete()
        .withf(|messages, options, _| {
            options.model == "gpt-4o-mini"
                && messages[0].content.starts_with("You are Researcher.")
                && messages[1].content.starts_with("List pros and cons")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, options, _| {
            Ok(Completion::text(options.model, "- LangGraph: explicit control flow"))
        });

    client
        .expect_complete()
        .withf(|messages, options, _| {
            options.model == "gpt-4o"
                && messages[0].content.starts_with("You are Technical Writer.")
                && messages[1]
                    .content
                    .ends_with("- LangGraph: explicit control flow")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, options, _| {
            Ok(Completion::text(options.model, "## Choosing a Framework"))
        });

    let client: Arc<dyn ChatClient> = Arc::new(client);
    let researcher = Agent::new(
        "Researcher",
        "Gather technical insights about LLM frameworks",
        "You read docs and summarize key points.",
        client.clone(),
        ChatCompletionRequestOptions::new("gpt-4o-mini", 0.0),
    );
    let writer = Agent::new(
        "Technical Writer",
        "Create a concise GitHub README from research notes",
        "You write clean, developer-friendly docs.",
        client,
        ChatCompletionRequestOptions::new("gpt-4o", 0.0),
    );

    let crew = Crew::new(vec![
        Task::new(
            "List pros and cons of LangChain, LangGraph, CrewAI and AutoGen.",
            researcher,
        )
        .with_expected_output("Bullet list of pros and cons for each framework."),
        Task::new(
            "Using the research notes, draft a README section titled 'Choosing a Framework'.",
            writer,
        )
        .with_expected_output("Markdown section with headings and bullet points.")
        .with_context([0]),
    ])
    .with_name("readme_crew");

    let output = crew.kickoff(&Context::default()).await.unwrap();

    assert_eq!(output.raw, "## Choosing a Framework");
    assert_eq!(output.tasks_output[0].raw, "- LangGraph: explicit control flow");
}
