use super::{LedgerAccount, LedgerReader, Submitter};
use crate::errors::{AirdropError, Result};
use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Fixed account set for unit tests. Submissions are recorded, not executed.
#[derive(Default)]
pub(crate) struct MemoryLedger {
    accounts: HashMap<Pubkey, LedgerAccount>,
    pub reads: AtomicUsize,
    pub submitted: Mutex<Vec<Transaction>>,
    /// Signature the node claims for every submission; defaults to the signed one.
    pub acknowledged: Option<Signature>,
}

impl MemoryLedger {
    pub fn with_mint(mut self, mint: Pubkey, decimals: u8, program: Pubkey) -> Self {
        let mut data = vec![0u8; 82];
        data[44] = decimals;
        data[45] = 1;
        self.accounts.insert(mint, LedgerAccount { owner: program, lamports: 1, data });
        self
    }

    pub fn with_token_account(mut self, address: Pubkey, mint: Pubkey, amount: u64, program: Pubkey) -> Self {
        let mut data = vec![0u8; 165];
        data[0..32].copy_from_slice(mint.as_ref());
        data[64..72].copy_from_slice(&amount.to_le_bytes());
        data[108] = 1;
        self.accounts.insert(address, LedgerAccount { owner: program, lamports: 1, data });
        self
    }

    pub fn acknowledging(mut self, signature: Signature) -> Self {
        self.acknowledged = Some(signature);
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerReader for MemoryLedger {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<LedgerAccount>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.get(address).cloned())
    }

    async fn latest_checkpoint(&self) -> Result<Hash> {
        Ok(Hash::new_unique())
    }
}

#[async_trait]
impl Submitter for MemoryLedger {
    async fn submit(&self, wire_transaction: &[u8]) -> Result<Signature> {
        let tx: Transaction = bincode::deserialize(wire_transaction)
            .map_err(|e| AirdropError::SubmissionRejected { reason: format!("malformed: {e}") })?;
        let signature = self.acknowledged.unwrap_or(tx.signatures[0]);
        self.submitted.lock().unwrap().push(tx);
        Ok(signature)
    }
}
