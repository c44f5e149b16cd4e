use super::token::{build_create_associated_token_account_ix, build_transfer_checked_ix};
use crate::address::associated_token_address;
use crate::constants::TOKENS_PER_DISBURSEMENT;
use crate::errors::{AirdropError, Result};
use crate::ledger::LedgerReader;
use crate::utils::raw_amount;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

/// Instructions and derived facts for a single disbursement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisbursementPlan {
    /// Ordered instructions; account creation, when present, comes first.
    pub instructions: Vec<Instruction>,
    pub source_account: Pubkey,
    pub destination_account: Pubkey,
    pub token_program: Pubkey,
    pub raw_amount: u64,
    pub decimals: u8,
    pub creates_destination: bool,
}

/// Builds the instruction list moving one whole token of `mint` from the
/// custodial wallet to `destination_wallet`.
///
/// Validation happens before anything is built: a missing custodial token
/// account or a balance below one token aborts with no instructions.
///
/// # Errors
/// - `MintUnavailable` if the mint cannot be read or decoded
/// - `SourceAccountMissing` if the custodial token account does not exist
/// - `InsufficientFunds` if the custodial balance is below one token
/// - `AmountOverflow` if one token does not fit in a u64
pub async fn plan_disbursement<R: LedgerReader + ?Sized>(
    reader: &R,
    custodial: &Pubkey,
    destination_wallet: &Pubkey,
    mint: &Pubkey,
) -> Result<DisbursementPlan> {
    let mint_info = reader.mint_info(mint).await?;
    let token_program = mint_info.token_program;

    let source_account = associated_token_address(custodial, mint, &token_program);
    let destination_account = associated_token_address(destination_wallet, mint, &token_program);

    if !reader.account_exists(&source_account).await? {
        return Err(AirdropError::SourceAccountMissing(source_account));
    }

    let decimals = mint_info.decimals;
    let amount = raw_amount(TOKENS_PER_DISBURSEMENT, decimals)?;

    let balance = reader.token_balance(&source_account).await?;
    if balance < amount {
        return Err(AirdropError::InsufficientFunds {
            balance,
            required: amount,
        });
    }

    let creates_destination = !reader.account_exists(&destination_account).await?;
    debug!(
        %source_account,
        %destination_account,
        balance,
        amount,
        creates_destination,
        "disbursement validated"
    );

    let mut instructions = Vec::with_capacity(2);
    if creates_destination {
        instructions.push(build_create_associated_token_account_ix(
            custodial,
            &destination_account,
            destination_wallet,
            mint,
            &token_program,
        ));
    }
    instructions.push(build_transfer_checked_ix(
        &source_account,
        mint,
        &destination_account,
        custodial,
        amount,
        decimals,
        &token_program,
    ));

    Ok(DisbursementPlan {
        instructions,
        source_account,
        destination_account,
        token_program,
        raw_amount: amount,
        decimals,
        creates_destination,
    })
}
