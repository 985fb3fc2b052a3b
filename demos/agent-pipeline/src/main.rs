use routegraph::agent::{Agent, Crew, Task};
use routegraph::config::{Settings, CONFIG_PATH_ENV};
use routegraph::{ChatClient, Context};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

async fn basic_crew(client: Arc<dyn ChatClient>, settings: &Settings) -> anyhow::Result<()> {
    let helper = Agent::new(
        "Helper",
        "Answer simple questions clearly",
        "You are a friendly assistant.",
        client,
        (&settings.models.chat).into(),
    );
    let crew = Crew::new(vec![Task::new(
        "Explain what LangChain is in 3 bullet points.",
        helper,
    )])
    .with_name("basic_crew");

    let result = crew.kickoff(&Context::default()).await?;
    println!("BASIC RESULT:\n{}", result.raw);
    Ok(())
}

async fn research_crew(client: Arc<dyn ChatClient>, settings: &Settings) -> anyhow::Result<()> {
    let researcher = Agent::new(
        "Researcher",
        "Gather technical insights about LLM frameworks",
        "You read docs and summarize key points.",
        client.clone(),
        (&settings.models.small).into(),
    );
    let writer = Agent::new(
        "Technical Writer",
        "Create a concise GitHub README from research notes",
        "You write clean, developer-friendly docs.",
        client,
        (&settings.models.big).into(),
    );

    let crew = Crew::new(vec![
        Task::new(
            "List pros and cons of LangChain, LangGraph, CrewAI and AutoGen \
             for building agentic workflows.",
            researcher,
        )
        .with_expected_output("Bullet list of pros and cons for each framework."),
        Task::new(
            "Using the research notes, draft a README section titled \
             'Choosing a Framework' in markdown.",
            writer,
        )
        .with_expected_output("Markdown section with headings and bullet points.")
        .with_context([0]),
    ])
    .with_name("research_crew");

    let result = crew.kickoff(&Context::default()).await?;
    println!("\nADVANCED RESULT:\n{}", result.raw);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("routegraph=info,warn")),
        )
        .with_target(false)
        .init();

    let config_path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
    let settings = Settings::load_or_env(config_path.as_deref())?;
    let client = settings.chat_client();

    println!("=== BASIC CREWAI ===");
    basic_crew(client.clone(), &settings).await?;

    println!("\n=== ADVANCED MULTI-AGENT CREW ===");
    research_crew(client, &settings).await?;

    Ok(())
}
