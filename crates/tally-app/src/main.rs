//! Tally application entry point.
//!
//! Loads configuration, sets up logging, and runs the chat client in
//! interactive, one-shot, or health-check mode.

mod cli;
mod repl;

use clap::Parser;
use tally_chat::{AskBackend, ChatSession, HttpBackend};
use tally_core::TallyConfig;

use crate::cli::CliArgs;

fn load_config(args: &CliArgs) -> Result<TallyConfig, Box<dyn std::error::Error>> {
    let path = args.resolve_config_path();
    // An explicitly named file must exist; the default location is optional.
    let mut config = if args.config.is_some() || path.exists() {
        TallyConfig::load(&path)?
    } else {
        TallyConfig::default()
    };
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let config = load_config(&args)?;

    // Logs go to stderr so they never interleave with the transcript.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Tally v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        base_url = %config.backend.base_url,
        mode = %config.chat.resolve_mode,
        "Configuration resolved"
    );

    let backend = HttpBackend::from_config(&config.backend)?;

    if args.check {
        match backend.health().await {
            Ok(()) => {
                println!("backend at {} is healthy", backend.base_url());
                return Ok(());
            }
            Err(e) => {
                tracing::error!(base_url = %backend.base_url(), error = %e, "Health check failed");
                return Err(e.into());
            }
        }
    }

    let session = ChatSession::from_config(backend, &config.chat);

    match args.one_shot() {
        Some(text) => repl::run_once(&session, &text).await,
        None => repl::run_interactive(&session).await?,
    }

    Ok(())
}
