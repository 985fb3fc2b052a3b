use routegraph::config::{Settings, CONFIG_PATH_ENV};
use routegraph::workflows::chat::{chat_graph, ChatNode};
use routegraph::MessagesState;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

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

    let node = ChatNode::new(
        "chat",
        settings.chat_client(),
        (&settings.models.chat).into(),
    );
    let graph = chat_graph(node)?;

    println!("=== BASIC LANGGRAPH ===");
    let result = graph
        .invoke(MessagesState::from_human("Explain LangGraph in 1 sentence."))
        .await?;
    for message in &result.messages {
        println!("{}", message);
    }

    Ok(())
}
