//! Contract query messages and response shapes for SNIP-721 style collections.
//!
//! Response fields are all optional so that an absent field surfaces as a
//! domain error in the fetcher rather than as a decode failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Address plus resolved code hash, sent with every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractRef {
    pub address: String,
    pub code_hash: String,
}

/// Collection identity, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub name: String,
    pub token_count: u32,
}

/// Query kinds understood by the collection contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    ContractInfo {},
    NumTokens {},
    AllTokens { limit: u32 },
    NftInfo { token_id: String },
}

impl QueryMsg {
    /// Query name as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryMsg::ContractInfo {} => "contract_info",
            QueryMsg::NumTokens {} => "num_tokens",
            QueryMsg::AllTokens { .. } => "all_tokens",
            QueryMsg::NftInfo { .. } => "nft_info",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractInfoResponse {
    pub contract_info: Option<ContractInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractInfo {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NumTokensResponse {
    pub num_tokens: Option<NumTokens>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NumTokens {
    pub count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenListResponse {
    pub token_list: Option<TokenList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenList {
    #[serde(default)]
    pub tokens: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NftInfoResponse {
    pub nft_info: Option<NftInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NftInfo {
    pub token_uri: Option<String>,
    pub extension: Option<Value>,
}

impl NftInfo {
    /// URI when present, otherwise the inline extension.
    pub fn into_metadata(self) -> Option<TokenMetadata> {
        match (self.token_uri, self.extension) {
            (Some(uri), _) => Some(TokenMetadata::Uri(uri)),
            (None, Some(ext)) if !ext.is_null() => Some(TokenMetadata::Extension(ext)),
            _ => None,
        }
    }
}

/// Per-token metadata as written to the output file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenMetadata {
    Uri(String),
    Extension(Value),
}
