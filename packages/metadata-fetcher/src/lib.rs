//! # Metadata Fetcher
//!
//! Fetches the metadata of every token in an NFT collection contract and
//! writes it to `<output_dir>/<collection name> (<token count>).json`.
//!
//! ## Quick Start
//! ```bash
//! cargo run --bin fetch-metadata -- --contract-address secret1...
//! ```
//!
//! ## Pipeline
//! - code hash → `contract_info` → `num_tokens` → `all_tokens`
//! - `nft_info` per token, sequentially, in enumeration order
//! - one JSON array written once, after the loop

pub mod cli;
pub mod config;
mod error;
pub mod fetcher;
pub mod output;
pub mod query;
pub mod rpc;

pub use cli::FetchCommand;
pub use config::Config;
pub use error::{Error, Result};
pub use fetcher::{FetchReport, MetadataFetcher, TokenFailure};
pub use rpc::{LcdClient, QueryService};

use std::path::{Path, PathBuf};

/// Fetch one collection through `service` and write it into `output_dir`.
pub async fn fetch_to_dir<Q>(service: &Q, address: &str, output_dir: &Path) -> Result<PathBuf>
where
    Q: QueryService + ?Sized,
{
    let report = MetadataFetcher::new(service).fetch(address).await?;
    output::write_report(output_dir, &report)
}

/// Run a fetch command end to end against the configured node.
pub async fn run(command: &FetchCommand, config: &Config) -> Result<PathBuf> {
    let client = LcdClient::connect(config).await?;
    fetch_to_dir(&client, &command.contract_address, &config.output_dir).await
}
