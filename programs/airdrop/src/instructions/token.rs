use crate::constants::opcodes::TRANSFER_CHECKED;
use crate::constants::program_ids::{ATA_PROGRAM_ID, SYSTEM_PROGRAM_ID, SYSVAR_RENT_ID};
use crate::constants::TRANSFER_CHECKED_DATA_LEN;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

/// Creates the associated token account `token_account` for `wallet`.
///
/// The payload is empty: the Associated Token Account program treats an empty
/// instruction as `Create`. Account order is fixed by that program.
pub fn build_create_associated_token_account_ix(
    payer: &Pubkey,
    token_account: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: ATA_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*token_account, false),
            AccountMeta::new_readonly(*wallet, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(*token_program, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
        data: vec![],
    }
}

/// `TransferChecked` payload: opcode, little-endian amount, decimals.
pub fn encode_transfer_checked(amount: u64, decimals: u8) -> [u8; TRANSFER_CHECKED_DATA_LEN] {
    let mut data = [0u8; TRANSFER_CHECKED_DATA_LEN];
    data[0] = TRANSFER_CHECKED;
    data[1..9].copy_from_slice(&amount.to_le_bytes());
    data[9] = decimals;
    data
}

/// Moves `amount` raw units of `mint` from `source` to `destination`,
/// authorized by `authority`. The token program rejects the transfer unless
/// `decimals` matches the mint.
pub fn build_transfer_checked_ix(
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
    decimals: u8,
    token_program: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *token_program,
        accounts: vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: encode_transfer_checked(amount, decimals).to_vec(),
    }
}
