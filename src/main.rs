//! Survival Insight - Main Entry Point

use clap::Parser;
use survival_insight::cli::{cmd_analyze, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "survival_insight=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            cmd_serve(&host, port).await?;
        }
        Some(Commands::Analyze { data, output, limit }) => {
            cmd_analyze(&data, output.as_deref(), limit)?;
        }
        None => {
            let config = survival_insight::server::ServerConfig::default();
            cmd_serve(&config.host, config.port).await?;
        }
    }

    Ok(())
}
