use clap::{Parser, Subcommand};

mod pipeline;

#[derive(Debug, Parser)]
#[command(name = "tagsignal")]
#[command(about = "Hashtag market-sentiment batch pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the collect → clean → score pipeline once.
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run) | None => pipeline::run().await,
    }
}
