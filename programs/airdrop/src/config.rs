//! Process configuration.
//!
//! Values come from an optional TOML file and are overridden by `AIRDROP_*`
//! environment variables. Everything is validated once, at startup.

use crate::address::parse_address;
use crate::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, EXPLORER_BASE_URL};
use crate::credential::CredentialSource;
use crate::errors::{AirdropError, Result};
use crate::transaction::FeeSettings;
use reqwest::Url;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_RPC_URL: &str = "AIRDROP_RPC_URL";
pub const ENV_MINT: &str = "AIRDROP_MINT";
pub const ENV_CLUSTER: &str = "AIRDROP_CLUSTER";
pub const ENV_COMMITMENT: &str = "AIRDROP_COMMITMENT";
pub const ENV_TIMEOUT_SECS: &str = "AIRDROP_TIMEOUT_SECS";
pub const ENV_KEYPAIR: &str = "AIRDROP_KEYPAIR";
pub const ENV_KEYPAIR_PATH: &str = "AIRDROP_KEYPAIR_PATH";
pub const ENV_PRIORITY_FEE: &str = "AIRDROP_PRIORITY_FEE_MICROLAMPORTS";
pub const ENV_COMPUTE_UNIT_LIMIT: &str = "AIRDROP_COMPUTE_UNIT_LIMIT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    MainnetBeta,
    #[default]
    Devnet,
    Testnet,
    Localnet,
}

impl Cluster {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::Localnet => "localnet",
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Explorer link for a submitted transaction.
    ///
    /// Localnet links point the explorer at `rpc_url`, the node the
    /// transaction was sent to.
    pub fn explorer_url(&self, signature: &Signature, rpc_url: &str) -> String {
        let base = format!("{EXPLORER_BASE_URL}/{signature}");
        match self {
            Cluster::MainnetBeta => base,
            Cluster::Localnet => {
                Url::parse_with_params(&base, [("cluster", "custom"), ("customUrl", rpc_url)])
                    .map(String::from)
                    .unwrap_or(base)
            }
            other => format!("{base}?cluster={}", other.as_str()),
        }
    }
}

impl FromStr for Cluster {
    type Err = AirdropError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            other => Err(AirdropError::Config(format!("unknown cluster {other:?}"))),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl FromStr for Commitment {
    type Err = AirdropError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(AirdropError::Config(format!("unknown commitment {other:?}"))),
        }
    }
}

/// Config file contents before environment overrides and validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub rpc_url: Option<String>,
    pub mint: Option<String>,
    pub cluster: Option<Cluster>,
    pub commitment: Option<Commitment>,
    pub request_timeout_secs: Option<u64>,
    pub priority_fee_micro_lamports: Option<u64>,
    pub compute_unit_limit: Option<u32>,
    pub keypair_path: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| AirdropError::Config(e.to_string()))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AirdropError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }
}

/// Validated configuration of one disbursing process.
#[derive(Debug, Clone)]
pub struct AirdropConfig {
    pub rpc_url: String,
    pub mint: Pubkey,
    pub cluster: Cluster,
    pub commitment: Commitment,
    pub request_timeout: Duration,
    pub fees: FeeSettings,
    pub credential: CredentialSource,
}

impl AirdropConfig {
    /// Reads `path` (if any) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merges file values with overrides from `env` and validates the result.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cluster = match env(ENV_CLUSTER) {
            Some(raw) => raw.parse()?,
            None => file.cluster.unwrap_or_default(),
        };
        let commitment = match env(ENV_COMMITMENT) {
            Some(raw) => raw.parse()?,
            None => file.commitment.unwrap_or_default(),
        };
        let rpc_url = env(ENV_RPC_URL)
            .or(file.rpc_url)
            .unwrap_or_else(|| cluster.default_rpc_url().to_string());

        let mint = env(ENV_MINT)
            .or(file.mint)
            .ok_or_else(|| AirdropError::Config(format!("mint is required (set {ENV_MINT})")))?;
        let mint = parse_address(&mint)
            .map_err(|_| AirdropError::Config(format!("mint {mint:?} is not a valid address")))?;

        let timeout_secs = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => parse_number::<u64>(ENV_TIMEOUT_SECS, &raw)?,
            None => file.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(AirdropError::Config("request timeout must be positive".into()));
        }

        let compute_unit_price = match env(ENV_PRIORITY_FEE) {
            Some(raw) => Some(parse_number::<u64>(ENV_PRIORITY_FEE, &raw)?),
            None => file.priority_fee_micro_lamports,
        };
        let compute_unit_limit = match env(ENV_COMPUTE_UNIT_LIMIT) {
            Some(raw) => Some(parse_number::<u32>(ENV_COMPUTE_UNIT_LIMIT, &raw)?),
            None => file.compute_unit_limit,
        };

        let credential = match (env(ENV_KEYPAIR), env(ENV_KEYPAIR_PATH).map(PathBuf::from)) {
            (Some(_), Some(_)) => {
                return Err(AirdropError::Config(format!(
                    "set only one of {ENV_KEYPAIR} and {ENV_KEYPAIR_PATH}"
                )))
            }
            (Some(secret), None) => CredentialSource::Base58(secret),
            (None, Some(path)) => CredentialSource::File(path),
            (None, None) => match file.keypair_path {
                Some(path) => CredentialSource::File(path),
                None => {
                    return Err(AirdropError::Config(format!(
                        "signing credential is required (set {ENV_KEYPAIR} or {ENV_KEYPAIR_PATH})"
                    )))
                }
            },
        };

        Ok(Self {
            rpc_url,
            mint,
            cluster,
            commitment,
            request_timeout: Duration::from_secs(timeout_secs),
            fees: FeeSettings {
                compute_unit_price,
                compute_unit_limit,
            },
            credential,
        })
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AirdropError::Config(format!("{key}={raw:?}: {e}")))
}
