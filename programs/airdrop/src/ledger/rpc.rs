use super::{LedgerAccount, LedgerReader, Submitter};
use crate::config::Commitment;
use crate::errors::{AirdropError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// JSON-RPC 2.0 client for a Solana node.
///
/// Every request is bounded by the timeout given at construction; an expired
/// request surfaces as [`AirdropError::Transport`].
#[derive(Debug)]
pub struct RpcLedger {
    http: Client,
    url: String,
    commitment: Commitment,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct RpcAccount {
    data: (String, String),
    owner: String,
    lamports: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcBlockhash {
    blockhash: String,
}

impl RpcLedger {
    pub fn new(url: impl Into<String>, commitment: Commitment, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            commitment,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<RpcResponse<T>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc request");
        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<RpcResponse<T>>().await?)
    }

    /// Unwraps a read response; node-side errors are transport failures.
    async fn read<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let response = self.call::<T>(method, params).await?;
        if let Some(err) = response.error {
            return Err(AirdropError::Transport(format!(
                "{method} failed ({}): {}",
                err.code, err.message
            )));
        }
        response
            .result
            .ok_or_else(|| AirdropError::Transport(format!("{method} returned no result")))
    }
}

#[async_trait]
impl LedgerReader for RpcLedger {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<LedgerAccount>> {
        let params = json!([
            address.to_string(),
            { "encoding": "base64", "commitment": self.commitment.as_str() },
        ]);
        let response: WithContext<Option<RpcAccount>> = self.read("getAccountInfo", params).await?;
        response.value.map(decode_account).transpose()
    }

    async fn latest_checkpoint(&self) -> Result<Hash> {
        let params = json!([{ "commitment": self.commitment.as_str() }]);
        let response: WithContext<RpcBlockhash> = self.read("getLatestBlockhash", params).await?;
        Hash::from_str(&response.value.blockhash)
            .map_err(|e| AirdropError::Transport(format!("malformed blockhash: {e}")))
    }
}

#[async_trait]
impl Submitter for RpcLedger {
    async fn submit(&self, wire_transaction: &[u8]) -> Result<Signature> {
        let params = json!([
            BASE64.encode(wire_transaction),
            {
                "encoding": "base64",
                "skipPreflight": false,
                "preflightCommitment": self.commitment.as_str(),
                "maxRetries": 0,
            },
        ]);
        let response = self.call::<String>("sendTransaction", params).await?;
        if let Some(err) = response.error {
            return Err(AirdropError::SubmissionRejected {
                reason: rejection_reason(&err),
            });
        }
        let signature = response
            .result
            .ok_or_else(|| AirdropError::Transport("sendTransaction returned no result".into()))?;
        Signature::from_str(&signature)
            .map_err(|e| AirdropError::Transport(format!("malformed signature {signature:?}: {e}")))
    }
}

fn decode_account(account: RpcAccount) -> Result<LedgerAccount> {
    let (payload, encoding) = account.data;
    if encoding != "base64" {
        return Err(AirdropError::Transport(format!("unexpected account encoding {encoding:?}")));
    }
    let data = BASE64
        .decode(payload)
        .map_err(|e| AirdropError::Transport(format!("malformed account data: {e}")))?;
    let owner = Pubkey::from_str(&account.owner)
        .map_err(|e| AirdropError::Transport(format!("malformed account owner: {e}")))?;
    Ok(LedgerAccount {
        owner,
        lamports: account.lamports,
        data,
    })
}

/// Node message plus the preflight error and the tail of the program logs, if any.
fn rejection_reason(err: &RpcErrorObject) -> String {
    let mut reason = err.message.clone();
    if let Some(data) = &err.data {
        if let Some(tx_err) = data.get("err").filter(|v| !v.is_null()) {
            reason.push_str(&format!(" [{tx_err}]"));
        }
        if let Some(last_log) = data
            .get("logs")
            .and_then(Value::as_array)
            .and_then(|logs| logs.last())
            .and_then(Value::as_str)
        {
            reason.push_str(&format!(" ({last_log})"));
        }
    }
    reason
}
