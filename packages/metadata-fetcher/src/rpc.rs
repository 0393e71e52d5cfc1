//! Contract query service and its LCD (REST) implementation.
//!
//! Queries leave this module as plaintext base64 JSON. They are only valid
//! against a gateway that performs the chain's query encryption; a bare
//! Secret Network node rejects them.
//!
//! The node owns address validation. Its bech32 rejection is mapped to
//! [`Error::AddressInvalid`] here, so nothing above this module matches on
//! message text.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::query::{ContractRef, QueryMsg};

/// Node error text for an address that fails bech32 decoding.
const BECH32_DECODE_FAILED: &str = "decoding bech32 failed";

/// Contract-call capable query service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Code hash of the contract deployed at `address`.
    async fn contract_code_hash(&self, address: &str) -> Result<String>;

    /// Run a smart query and return the decoded JSON answer.
    async fn query_contract(&self, contract: &ContractRef, query: &QueryMsg) -> Result<Value>;
}

/// Run `query` and decode the answer into `T`.
pub async fn query<T, Q>(service: &Q, contract: &ContractRef, query: &QueryMsg) -> Result<T>
where
    T: DeserializeOwned,
    Q: QueryService + ?Sized,
{
    let value = service.query_contract(contract, query).await?;
    serde_json::from_value(value)
        .map_err(|e| Error::Rpc(format!("malformed '{}' response: {e}", query.kind())))
}

#[derive(Deserialize)]
struct NodeInfoResponse {
    default_node_info: NodeInfo,
}

#[derive(Deserialize)]
struct NodeInfo {
    network: String,
}

#[derive(Deserialize)]
struct CodeHashResponse {
    code_hash: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    data: Value,
}

#[derive(Deserialize)]
struct LcdErrorBody {
    message: Option<String>,
}

/// Query client for a chain node's LCD endpoint.
pub struct LcdClient {
    http: reqwest::Client,
    base_url: Url,
    chain_id: String,
}

impl LcdClient {
    /// Build the client without touching the network.
    pub fn new(config: &Config) -> Result<Self> {
        let lcd_url = config.gateway_url()?;
        let base_url = Url::parse(lcd_url)
            .map_err(|e| Error::Config(format!("invalid lcd_url '{lcd_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "lcd_url '{lcd_url}' cannot carry a path"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| Error::Config(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url,
            chain_id: config.chain_id.clone(),
        })
    }

    /// Build the client and check that the node serves the configured chain.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Self::new(config)?;
        client.verify_chain_id().await?;
        info!(lcd = %client.base_url, chain_id = %client.chain_id, "Query client connected");
        Ok(client)
    }

    async fn verify_chain_id(&self) -> Result<()> {
        let url = self.endpoint(&["cosmos", "base", "tendermint", "v1beta1", "node_info"])?;
        let resp: NodeInfoResponse = self.get_json(url, &[]).await?;
        let network = resp.default_node_info.network;
        if network != self.chain_id {
            return Err(Error::Config(format!(
                "node serves chain '{network}', expected '{}'",
                self.chain_id
            )));
        }
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("lcd_url '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, params: &[(&str, &str)]) -> Result<T> {
        debug!(url = %url, "LCD request");
        let response = self
            .http
            .get(url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| Error::Rpc(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Rpc(format!("invalid response from {url}: {e}")))
    }
}

#[async_trait]
impl QueryService for LcdClient {
    async fn contract_code_hash(&self, address: &str) -> Result<String> {
        let url = self.endpoint(&[
            "compute",
            "v1beta1",
            "code_hash",
            "by_contract_address",
            address,
        ])?;
        let resp: CodeHashResponse = self.get_json(url, &[]).await?;
        Ok(resp.code_hash)
    }

    async fn query_contract(&self, contract: &ContractRef, query: &QueryMsg) -> Result<Value> {
        let body = serde_json::to_vec(query)
            .map_err(|e| Error::Rpc(format!("failed to encode '{}': {e}", query.kind())))?;
        let encoded = B64.encode(body);
        let url = self.endpoint(&["compute", "v1beta1", "query", contract.address.as_str()])?;
        let resp: QueryResponse = self
            .get_json(
                url,
                &[
                    ("query", encoded.as_str()),
                    ("code_hash", contract.code_hash.as_str()),
                ],
            )
            .await?;
        decode_query_data(resp.data, query.kind())
    }
}

/// Answers arrive either base64-encoded or as inline JSON.
fn decode_query_data(data: Value, kind: &str) -> Result<Value> {
    match data {
        Value::String(encoded) => {
            let raw = B64
                .decode(encoded.as_bytes())
                .map_err(|e| Error::Rpc(format!("'{kind}' answer is not base64: {e}")))?;
            serde_json::from_slice(&raw)
                .map_err(|e| Error::Rpc(format!("'{kind}' answer is not JSON: {e}")))
        }
        other => Ok(other),
    }
}

fn classify_failure(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<LcdErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string());

    if message.contains(BECH32_DECODE_FAILED) {
        return Error::AddressInvalid;
    }
    Error::Rpc(format!("HTTP {status}: {message}"))
}
