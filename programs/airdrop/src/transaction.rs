use crate::errors::{AirdropError, Result};
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

/// Optional compute-budget settings prepended to every transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeSettings {
    /// Priority fee in micro-lamports per compute unit.
    pub compute_unit_price: Option<u64>,
    pub compute_unit_limit: Option<u32>,
}

impl FeeSettings {
    fn instructions(&self) -> Vec<Instruction> {
        let mut ixs = Vec::new();
        if let Some(limit) = self.compute_unit_limit {
            ixs.push(ComputeBudgetInstruction::set_compute_unit_limit(limit));
        }
        if let Some(price) = self.compute_unit_price {
            ixs.push(ComputeBudgetInstruction::set_compute_unit_price(price));
        }
        ixs
    }
}

/// A signed transaction ready for submission.
#[derive(Debug, Clone)]
pub struct SignedDisbursement {
    pub transaction: Transaction,
    /// Fee payer signature; doubles as the transaction id.
    pub signature: Signature,
    /// Wire encoding sent to the node.
    pub wire: Vec<u8>,
}

/// Builds, signs and serializes a transaction paid for by `credential`.
///
/// Only valid while `checkpoint` is recent, so callers should submit the
/// result immediately.
pub fn assemble(
    instructions: &[Instruction],
    credential: &Keypair,
    checkpoint: Hash,
    fees: &FeeSettings,
) -> Result<SignedDisbursement> {
    if instructions.is_empty() {
        return Err(AirdropError::EmptyTransaction);
    }

    let payer = credential.pubkey();
    let mut ixs = fees.instructions();
    ixs.extend_from_slice(instructions);

    let message = Message::new(&ixs, Some(&payer));
    let mut transaction = Transaction::new_unsigned(message);
    transaction
        .try_sign(&[credential], checkpoint)
        .map_err(|e| AirdropError::SigningFailure(e.to_string()))?;

    let signature = *transaction
        .signatures
        .first()
        .ok_or_else(|| AirdropError::SigningFailure("transaction carries no signature".into()))?;
    let wire = bincode::serialize(&transaction)
        .map_err(|e| AirdropError::SigningFailure(format!("encode: {e}")))?;

    Ok(SignedDisbursement {
        transaction,
        signature,
        wire,
    })
}
