//! Error types for the metadata fetcher.

use std::fmt;

/// Fetcher error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed command line. Raised before any network activity.
    Arguments,
    /// The node rejected the contract address as invalid bech32.
    AddressInvalid,
    /// Configuration error.
    Config(String),
    /// Transport or decoding failure talking to the query service.
    Rpc(String),
    /// `contract_info` returned no collection name.
    CollectionNotFound { address: String },
    /// `num_tokens` returned no count.
    TokenCountUnavailable { collection: String },
    /// `num_tokens` reported zero tokens.
    EmptyCollection { collection: String },
    /// `all_tokens` returned no token list.
    TokenListUnavailable { collection: String },
    /// `all_tokens` returned an empty list despite a nonzero count.
    TokenListEmpty { collection: String },
    /// A single `nft_info` query failed. Never aborts a run.
    TokenFetchFailed {
        collection: String,
        token_id: String,
        reason: String,
    },
    /// Writing the output file failed.
    Output(String),
}

impl Error {
    /// Whether this error aborts the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::TokenFetchFailed { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Arguments => write!(f, "Incorrect arguments provided!"),
            Error::AddressInvalid => write!(f, "Incorrect contract address provided!"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
            Error::CollectionNotFound { address } => {
                write!(f, "Failed to fetch 'contract_info' for {address}")
            }
            Error::TokenCountUnavailable { collection } => {
                write!(f, "Failed to fetch 'num_tokens' for {collection}")
            }
            Error::EmptyCollection { collection } => {
                write!(f, "The collection {collection} does not have any tokens!")
            }
            Error::TokenListUnavailable { collection } => {
                write!(f, "Failed to fetch 'all_tokens' for {collection}")
            }
            Error::TokenListEmpty { collection } => write!(
                f,
                "Did not get any token IDs from the 'all_tokens' query for {collection}!"
            ),
            Error::TokenFetchFailed {
                collection,
                token_id,
                reason,
            } => write!(
                f,
                "Failed to fetch 'nft_info' for {collection} (#{token_id}): {reason}"
            ),
            Error::Output(msg) => write!(f, "output error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
