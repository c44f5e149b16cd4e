use crate::constants::program_ids::ATA_PROGRAM_ID;
use crate::errors::{AirdropError, Result};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Parses a base58 wallet address.
///
/// Input is taken verbatim: surrounding whitespace, an empty string, a value
/// that does not decode to exactly 32 bytes, or any character outside the
/// base58 alphabet is rejected with `InvalidAddress`.
pub fn parse_address(text: &str) -> Result<Pubkey> {
    Pubkey::from_str(text).map_err(|_| AirdropError::InvalidAddress(text.to_string()))
}

/// Derives the program-owned token account holding `mint` for `owner`.
///
/// Seeds are `[owner, token_program, mint]` under `derivation_program`, the
/// same scheme the Associated Token Account program uses on chain, so the
/// result never has a signing key.
pub fn derive_token_account(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
    derivation_program: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        derivation_program,
    )
    .0
}

/// Associated token account of `owner` for `mint` under `token_program`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    derive_token_account(owner, mint, token_program, &ATA_PROGRAM_ID)
}
