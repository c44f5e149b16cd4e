//! Read and write access to the ledger.
//!
//! [`LedgerReader`] covers the reads a disbursement needs and [`Submitter`]
//! broadcasts the signed result. Both are implemented by [`rpc::RpcLedger`]
//! against a Solana JSON-RPC node. Nothing here caches: every call observes
//! whatever snapshot the node serves at that moment.

#[cfg(test)]
pub(crate) mod memory;
pub mod rpc;

use crate::constants::is_token_program;
use crate::errors::{AirdropError, Result};
use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use spl_token_2022::extension::StateWithExtensions;
use spl_token_2022::state::{Account as TokenAccount, Mint};

pub use rpc::RpcLedger;

/// Raw account as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAccount {
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

/// Mint facts needed to move one whole token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    pub decimals: u8,
    /// Token program owning the mint; transfers and derivations use it.
    pub token_program: Pubkey,
}

#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Returns the account at `address`, or `None` if nothing is allocated there.
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<LedgerAccount>>;

    /// Latest blockhash. Bounds the validity window of a transaction.
    async fn latest_checkpoint(&self) -> Result<Hash>;

    async fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        Ok(self.fetch_account(address).await?.is_some())
    }

    async fn mint_info(&self, mint: &Pubkey) -> Result<MintInfo> {
        let account = self
            .fetch_account(mint)
            .await?
            .ok_or(AirdropError::MintUnavailable(*mint))?;
        decode_mint(mint, &account)
    }

    async fn token_decimals(&self, mint: &Pubkey) -> Result<u8> {
        Ok(self.mint_info(mint).await?.decimals)
    }

    /// Raw balance of a token account. Missing accounts are an error, not zero.
    async fn token_balance(&self, account: &Pubkey) -> Result<u64> {
        let raw = self
            .fetch_account(account)
            .await?
            .ok_or(AirdropError::AccountUnavailable(*account))?;
        decode_token_amount(account, &raw)
    }
}

#[async_trait]
pub trait Submitter: Send + Sync {
    /// Broadcasts a serialized transaction. Success means the node accepted it
    /// for processing, not that it is final.
    async fn submit(&self, wire_transaction: &[u8]) -> Result<Signature>;
}

/// Decodes a mint owned by either token program.
pub fn decode_mint(address: &Pubkey, account: &LedgerAccount) -> Result<MintInfo> {
    if !is_token_program(&account.owner) {
        return Err(AirdropError::MintUnavailable(*address));
    }
    let mint = StateWithExtensions::<Mint>::unpack(&account.data)
        .map_err(|_| AirdropError::MintUnavailable(*address))?;
    if !mint.base.is_initialized {
        return Err(AirdropError::MintUnavailable(*address));
    }
    Ok(MintInfo {
        decimals: mint.base.decimals,
        token_program: account.owner,
    })
}

/// Decodes the raw amount held by a token account.
pub fn decode_token_amount(address: &Pubkey, account: &LedgerAccount) -> Result<u64> {
    if !is_token_program(&account.owner) {
        return Err(AirdropError::AccountUnavailable(*address));
    }
    let state = StateWithExtensions::<TokenAccount>::unpack(&account.data)
        .map_err(|_| AirdropError::AccountUnavailable(*address))?;
    Ok(state.base.amount)
}
