//! Metadata fetcher binary.

use metadata_fetcher::{Config, FetchCommand};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Argument errors are reported before any config load or network call.
    let command = match FetchCommand::from_env() {
        Ok(cmd) => cmd,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "FATAL: Config error, fix FETCHER_* env vars or fetcher.toml");
            return ExitCode::FAILURE;
        }
    };

    info!(
        contract = %command.contract_address,
        lcd = ?config.lcd_url,
        chain_id = %config.chain_id,
        "Fetching collection metadata"
    );

    match metadata_fetcher::run(&command, &config).await {
        Ok(path) => {
            info!(path = %path.display(), "Success! Your metadata has been saved to the `output` directory.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
