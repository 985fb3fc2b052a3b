use routegraph::config::{Settings, CONFIG_PATH_ENV};
use routegraph::workflows::router::{router_graph_with, RouterState};
use std::path::PathBuf;
use tracing::info;
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
    let graph = router_graph_with(settings.chat_client(), &settings.models)?;
    info!(small = %settings.models.small.model, big = %settings.models.big.model, "router graph ready");

    println!("=== ADVANCED ROUTER GRAPH ===");

    let q1 = "Quick: what is RAG?";
    let out1 = graph.invoke(RouterState::new(q1)).await?;
    println!("Q1: {}", q1);
    println!("A1: {}", out1.answer);

    let q2 = "Explain how to design a production-grade RAG system with LangChain and LangGraph.";
    let out2 = graph.invoke(RouterState::new(q2)).await?;
    println!("\nQ2: {}", q2);
    println!("A2: {}", out2.answer);

    Ok(())
}
