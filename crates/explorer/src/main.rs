//! Knowledge Explorer CLI - topic-aware questions answered by Gemini.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use explorer::{ChatSession, Credentials, ExplorerConfig, StreamCoordinator};
use explorer_core::init_tracing;
use explorer_models::GeminiClient;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_format, "info")?;

    if let Command::Topics = cli.command {
        cli::print_topics();
        return Ok(());
    }

    let mut config = ExplorerConfig::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    config.validate()?;

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(error = %e, "Missing API credentials");
            eprintln!("{}", e.message);
            std::process::exit(1);
        }
    };
    info!(source = credentials.source(), model = %config.model(), "Starting Knowledge Explorer");

    let client = Arc::new(
        GeminiClient::new(credentials.api_key(), config.model())
            .with_base_url(config.base_url())
            .with_request_timeout(config.request_timeout())
            .with_read_timeout(config.stream_idle_timeout()),
    );
    let coordinator =
        StreamCoordinator::new(Arc::clone(&client), client, config.coordinator_config());
    let session =
        ChatSession::new(coordinator).with_topic_relevance(*config.enforce_topic_relevance());

    match cli.command {
        Command::Ask(args) => cli::ask::run(&session, args, &config).await,
        Command::Chat(args) => cli::chat::run(&session, args, &config).await,
        Command::Topics => Ok(()),
    }
}
