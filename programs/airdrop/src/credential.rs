//! Loading of the custodial signing key.
//!
//! The key is read once at startup. Any failure here must stop the process
//! before it serves a single request.

use crate::errors::{AirdropError, Result};
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Where the custodial keypair comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Base58 encoding of the 64-byte keypair (secret followed by public key).
    Base58(String),
    /// Solana CLI keypair file: a JSON array of 64 bytes.
    File(PathBuf),
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Base58(_) => f.write_str("Base58(<redacted>)"),
            CredentialSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

pub fn keypair_from_base58(secret: &str) -> Result<Keypair> {
    let bytes = bs58::decode(secret.trim())
        .into_vec()
        .map_err(|e| AirdropError::Credential(format!("not base58: {e}")))?;
    keypair_from_bytes(&bytes)
}

pub fn keypair_from_file(path: &Path) -> Result<Keypair> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AirdropError::Credential(format!("read {}: {e}", path.display())))?;
    let bytes: Vec<u8> = serde_json::from_str(&raw)
        .map_err(|e| AirdropError::Credential(format!("parse {}: {e}", path.display())))?;
    keypair_from_bytes(&bytes)
}

fn keypair_from_bytes(bytes: &[u8]) -> Result<Keypair> {
    if bytes.len() != 64 {
        return Err(AirdropError::Credential(format!(
            "expected 64 keypair bytes, got {}",
            bytes.len()
        )));
    }
    // Also rejects a public half that does not belong to the secret half.
    Keypair::try_from(bytes).map_err(|e| AirdropError::Credential(e.to_string()))
}

/// Loads the custodial keypair for the lifetime of the process.
pub fn load_credential(source: &CredentialSource) -> Result<Arc<Keypair>> {
    let keypair = match source {
        CredentialSource::Base58(secret) => keypair_from_base58(secret)?,
        CredentialSource::File(path) => keypair_from_file(path)?,
    };
    info!(custodial = %keypair.pubkey(), "signing credential loaded");
    Ok(Arc::new(keypair))
}
