//! Fetcher configuration.
//!
//! Sources, lowest priority first: built-in defaults, optional `fetcher.toml`
//! in the working directory, then `FETCHER_*` environment variables.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the metadata fetcher.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// LCD endpoint of a query gateway that encrypts contract queries and
    /// decrypts their answers. No default: a plain node rejects plaintext
    /// compute queries.
    #[serde(default)]
    pub lcd_url: Option<String>,

    /// Chain id the node must report.
    #[serde(default = "defaults::chain_id")]
    pub chain_id: String,

    /// Directory receiving the JSON artifact. Must already exist.
    #[serde(default = "defaults::output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "defaults::request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "defaults::connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Config {
    /// Load from `fetcher.toml` (optional) and `FETCHER_*` env vars.
    pub fn load() -> Result<Self, crate::Error> {
        config::Config::builder()
            .add_source(config::File::with_name("fetcher").required(false))
            .add_source(config::Environment::with_prefix("FETCHER"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// The configured gateway URL, or a config error when none is set.
    pub fn gateway_url(&self) -> Result<&str, crate::Error> {
        self.lcd_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                crate::Error::Config(
                    "lcd_url is not set; point FETCHER_LCD_URL at a decrypting query gateway"
                        .into(),
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lcd_url: None,
            chain_id: defaults::chain_id(),
            output_dir: defaults::output_dir(),
            request_timeout_secs: defaults::request_timeout_secs(),
            connect_timeout_secs: defaults::connect_timeout_secs(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn chain_id() -> String {
        "secret-4".into()
    }

    pub fn output_dir() -> PathBuf {
        PathBuf::from("./output")
    }

    pub fn request_timeout_secs() -> u64 {
        30
    }

    pub fn connect_timeout_secs() -> u64 {
        10
    }
}
