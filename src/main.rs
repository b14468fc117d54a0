use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chat_widget::{
    config::{initialize_config, validate_config, ConfigOrigin},
    constants::LOG_FILE,
    gemini::{load_corpus, GeminiClient},
    logging::init_logging,
    server::{self, ServerState},
    ui::run_terminal,
};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "chat-widget", version, about = "Chat widget and reference /chat server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve `/chat` backed by Gemini and the local corpus.
    Serve {
        /// Address to bind, overrides the configured one.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Open the terminal chat widget.
    Chat {
        /// Chat endpoint URL, overrides the configured one.
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn log_config_origin(origin: &ConfigOrigin) {
    match origin {
        ConfigOrigin::Created(path) => {
            log::info!("Wrote default configuration to {}", path.display())
        }
        ConfigOrigin::Loaded(path) => log::debug!("Loaded configuration from {}", path.display()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (mut config, origin) = initialize_config().context("Failed to load configuration")?;

    match cli.command {
        Command::Serve { bind } => {
            init_logging(&config.log_level, None)?;
            log_config_origin(&origin);
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }

            let corpus = load_corpus(Path::new(&config.corpus_path))?;
            let generator = GeminiClient::new(&config, corpus)?;
            log::info!(
                "Using model {} with {} corpus documents",
                config.model,
                generator.corpus_len()
            );

            let state = ServerState::new(Arc::new(generator), &config.reply_field);
            server::serve(&config.bind_addr, state).await?;
        }
        Command::Chat { endpoint } => {
            init_logging(&config.log_level, Some(Path::new(LOG_FILE)))?;
            log_config_origin(&origin);
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
                validate_config(&config)?;
            }
            run_terminal(&config).await?;
        }
    }

    Ok(())
}
