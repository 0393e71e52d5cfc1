//! Command-line parsing.

use clap::Parser;

use crate::error::{Error, Result};

const CONTRACT_ADDRESS_FLAG: &str = "--contract-address";

/// A single fetch request, built once from the process arguments.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "fetch-metadata",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct FetchCommand {
    /// Bech32 address of the collection contract.
    #[arg(long = "contract-address", allow_hyphen_values = true)]
    pub contract_address: String,
}

impl FetchCommand {
    /// Parse the arguments following the program name.
    ///
    /// Only `--contract-address <address>` is accepted; any other shape is
    /// rejected before anything else happens.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.len() != 2 || args[0] != CONTRACT_ADDRESS_FLAG {
            return Err(Error::Arguments);
        }
        let argv = std::iter::once("fetch-metadata".to_string()).chain(args);
        Self::try_parse_from(argv).map_err(|_| Error::Arguments)
    }

    /// Parse the current process arguments.
    pub fn from_env() -> Result<Self> {
        Self::from_args(std::env::args().skip(1))
    }
}
