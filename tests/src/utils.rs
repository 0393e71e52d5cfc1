use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine;
use metadata_fetcher::Config;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const CONTRACT: &str = "secret1qxfm6e9kd0ye5ksuhhqvgtc4tntw8y2c3ekc6t";
pub const CODE_HASH: &str = "9a00ca4ad505e9be7e6e6dddf8d939b7ec7e9ac8e109c8681f10db9cacb36d42";
pub const NETWORK: &str = "secret-4";

/// Canned answers served by [`spawn_fake_lcd`].
#[derive(Clone)]
pub struct FakeChain {
    pub network: String,
    pub contract_info: Value,
    pub num_tokens: Value,
    pub all_tokens: Value,
    pub nft_info: HashMap<String, Value>,
}

impl FakeChain {
    /// A healthy collection whose tokens all carry a URI.
    pub fn collection(name: &str, ids: &[&str]) -> Self {
        Self {
            network: NETWORK.into(),
            contract_info: json!({"contract_info": {"name": name, "symbol": "NFT"}}),
            num_tokens: json!({"num_tokens": {"count": ids.len()}}),
            all_tokens: json!({"token_list": {"tokens": ids}}),
            nft_info: ids
                .iter()
                .map(|id| {
                    (
                        id.to_string(),
                        json!({"nft_info": {"token_uri": format!("ipfs://{id}"), "extension": null}}),
                    )
                })
                .collect(),
        }
    }
}

struct FakeState {
    chain: FakeChain,
    calls: Mutex<Vec<String>>,
}

/// In-process LCD endpoint.
pub struct FakeLcd {
    pub url: String,
    state: Arc<FakeState>,
}

impl FakeLcd {
    /// Endpoint paths and query kinds served so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }
}

pub async fn spawn_fake_lcd(chain: FakeChain) -> Result<FakeLcd> {
    let state = Arc::new(FakeState {
        chain,
        calls: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/cosmos/base/tendermint/v1beta1/node_info", get(node_info))
        .route(
            "/compute/v1beta1/code_hash/by_contract_address/{address}",
            get(code_hash),
        )
        .route("/compute/v1beta1/query/{address}", get(query_contract))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(FakeLcd {
        url: format!("http://{addr}"),
        state,
    })
}

async fn node_info(State(state): State<Arc<FakeState>>) -> Json<Value> {
    state.calls.lock().unwrap().push("node_info".into());
    Json(json!({"default_node_info": {"network": state.chain.network}}))
}

async fn code_hash(
    State(state): State<Arc<FakeState>>,
    Path(address): Path<String>,
) -> Response {
    state.calls.lock().unwrap().push("code_hash".into());
    if address != CONTRACT {
        return bech32_failure();
    }
    Json(json!({"code_hash": CODE_HASH})).into_response()
}

async fn query_contract(
    State(state): State<Arc<FakeState>>,
    Path(address): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if address != CONTRACT {
        return bech32_failure();
    }
    if params.get("code_hash").map(String::as_str) != Some(CODE_HASH) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": 2, "message": "code hash mismatch"})),
        )
            .into_response();
    }

    let query: Value = match params
        .get("query")
        .and_then(|q| BASE64_ENGINE.decode(q).ok())
        .and_then(|raw| serde_json::from_slice(&raw).ok())
    {
        Some(q) => q,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"code": 3, "message": "query is not base64 JSON"})),
            )
                .into_response()
        }
    };

    let chain = &state.chain;
    let (kind, answer) = if query.get("contract_info").is_some() {
        ("contract_info", chain.contract_info.clone())
    } else if query.get("num_tokens").is_some() {
        ("num_tokens", chain.num_tokens.clone())
    } else if query.get("all_tokens").is_some() {
        ("all_tokens", chain.all_tokens.clone())
    } else if let Some(token_id) = query["nft_info"]["token_id"].as_str() {
        (
            "nft_info",
            chain.nft_info.get(token_id).cloned().unwrap_or_else(|| json!({})),
        )
    } else {
        ("unknown", json!({}))
    };
    state.calls.lock().unwrap().push(kind.into());

    let data = BASE64_ENGINE.encode(serde_json::to_vec(&answer).unwrap());
    Json(json!({ "data": data })).into_response()
}

fn bech32_failure() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "code": 3,
            "message": "decoding bech32 failed: invalid checksum",
            "details": []
        })),
    )
        .into_response()
}

/// Fresh, existing output directory unique to `tag`.
pub fn output_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fetcher_it_{tag}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn config_for(lcd: &FakeLcd, output_dir: PathBuf) -> Config {
    Config {
        lcd_url: Some(lcd.url.clone()),
        chain_id: NETWORK.into(),
        output_dir,
        ..Config::default()
    }
}

pub fn dir_is_empty(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(true)
}
