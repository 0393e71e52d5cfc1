//! The fetch pipeline: code hash, collection, enumeration, per-token metadata.
//!
//! Collection-level problems abort the run. A failing token only costs its
//! own slot, which is filled with `null` so that the output stays aligned
//! with the enumeration order.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::query::{
    Collection, ContractInfoResponse, ContractRef, NftInfoResponse, NumTokensResponse, QueryMsg,
    TokenListResponse, TokenMetadata,
};
use crate::rpc::{self, QueryService};

/// A token whose metadata could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenFailure {
    /// Position in the enumeration.
    pub index: usize,
    pub token_id: String,
    pub reason: String,
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct FetchReport {
    pub contract: ContractRef,
    pub collection: Collection,
    pub token_ids: Vec<String>,
    /// One slot per entry of `token_ids`; `None` for failed tokens.
    pub entries: Vec<Option<TokenMetadata>>,
    pub failures: Vec<TokenFailure>,
}

impl FetchReport {
    /// Number of tokens whose metadata was fetched.
    pub fn fetched_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

/// Walks one collection contract through the query service.
pub struct MetadataFetcher<'a, Q: QueryService + ?Sized> {
    service: &'a Q,
}

impl<'a, Q: QueryService + ?Sized> MetadataFetcher<'a, Q> {
    pub fn new(service: &'a Q) -> Self {
        Self { service }
    }

    /// Fetch the metadata of every token of the collection at `address`.
    pub async fn fetch(&self, address: &str) -> Result<FetchReport> {
        let code_hash = self.service.contract_code_hash(address).await?;
        let contract = ContractRef {
            address: address.to_string(),
            code_hash,
        };

        let name = self.collection_name(&contract).await?;
        let token_count = self.token_count(&contract, &name).await?;
        let collection = Collection { name, token_count };

        let token_ids = self.token_ids(&contract, &collection).await?;
        info!(
            collection = %collection.name,
            tokens = token_ids.len(),
            "Found {} tokens in collection: {}",
            token_ids.len(),
            collection.name
        );
        if token_ids.len() != collection.token_count as usize {
            warn!(
                collection = %collection.name,
                count = collection.token_count,
                listed = token_ids.len(),
                "'all_tokens' length differs from 'num_tokens' count"
            );
        }

        let mut entries = Vec::with_capacity(token_ids.len());
        let mut failures = Vec::new();
        for (index, token_id) in token_ids.iter().enumerate() {
            match self.token_metadata(&contract, &collection, token_id).await {
                Ok(metadata) => entries.push(Some(metadata)),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!(
                        collection = %collection.name,
                        token_id = %token_id,
                        "{e}"
                    );
                    failures.push(TokenFailure {
                        index,
                        token_id: token_id.clone(),
                        reason: e.to_string(),
                    });
                    entries.push(None);
                }
            }
        }

        let report = FetchReport {
            contract,
            collection,
            token_ids,
            entries,
            failures,
        };
        info!(
            collection = %report.collection.name,
            fetched = report.fetched_count(),
            failed = report.failures.len(),
            "Fetched {} metadata objects for collection: {}",
            report.fetched_count(),
            report.collection.name
        );
        Ok(report)
    }

    async fn collection_name(&self, contract: &ContractRef) -> Result<String> {
        let resp: ContractInfoResponse =
            rpc::query(self.service, contract, &QueryMsg::ContractInfo {}).await?;
        resp.contract_info
            .and_then(|info| info.name)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::CollectionNotFound {
                address: contract.address.clone(),
            })
    }

    async fn token_count(&self, contract: &ContractRef, collection: &str) -> Result<u32> {
        let resp: NumTokensResponse =
            rpc::query(self.service, contract, &QueryMsg::NumTokens {}).await?;
        let count = resp
            .num_tokens
            .and_then(|n| n.count)
            .ok_or_else(|| Error::TokenCountUnavailable {
                collection: collection.to_string(),
            })?;
        if count == 0 {
            return Err(Error::EmptyCollection {
                collection: collection.to_string(),
            });
        }
        Ok(count)
    }

    async fn token_ids(&self, contract: &ContractRef, collection: &Collection) -> Result<Vec<String>> {
        // Limit equals the count so the whole list comes back in one page.
        let query = QueryMsg::AllTokens {
            limit: collection.token_count,
        };
        let resp: TokenListResponse = rpc::query(self.service, contract, &query).await?;
        let tokens = resp
            .token_list
            .ok_or_else(|| Error::TokenListUnavailable {
                collection: collection.name.clone(),
            })?
            .tokens;
        if tokens.is_empty() {
            return Err(Error::TokenListEmpty {
                collection: collection.name.clone(),
            });
        }
        Ok(tokens)
    }

    async fn token_metadata(
        &self,
        contract: &ContractRef,
        collection: &Collection,
        token_id: &str,
    ) -> Result<TokenMetadata> {
        let failed = |reason: String| Error::TokenFetchFailed {
            collection: collection.name.clone(),
            token_id: token_id.to_string(),
            reason,
        };

        let query = QueryMsg::NftInfo {
            token_id: token_id.to_string(),
        };
        let value: Value = self
            .service
            .query_contract(contract, &query)
            .await
            .map_err(|e| failed(e.to_string()))?;
        let resp: NftInfoResponse = serde_json::from_value(value)
            .map_err(|e| failed(format!("malformed 'nft_info' response: {e}")))?;

        resp.nft_info
            .ok_or_else(|| failed("response has no 'nft_info'".into()))?
            .into_metadata()
            .ok_or_else(|| failed("'nft_info' has neither 'token_uri' nor 'extension'".into()))
    }
}
