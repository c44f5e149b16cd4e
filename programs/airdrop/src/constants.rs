use solana_sdk::pubkey::Pubkey;

/// Well-known program and sysvar ids referenced by disbursement instructions
pub mod program_ids {
    use super::Pubkey;

    /// Legacy SPL Token program
    pub const TOKEN_PROGRAM_ID: Pubkey =
        solana_sdk::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

    /// SPL Token-2022 program
    pub const TOKEN_2022_PROGRAM_ID: Pubkey =
        solana_sdk::pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

    /// Associated Token Account program, owner of every derived token account
    pub const ATA_PROGRAM_ID: Pubkey =
        solana_sdk::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

    /// System program
    pub const SYSTEM_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("11111111111111111111111111111111");

    /// Rent parameters sysvar
    pub const SYSVAR_RENT_ID: Pubkey =
        solana_sdk::pubkey!("SysvarRent111111111111111111111111111111111");
}

/// Token program opcodes
pub mod opcodes {
    /// `TokenInstruction::TransferChecked`
    pub const TRANSFER_CHECKED: u8 = 12;
}

/// Length of an encoded TransferChecked payload: opcode + u64 amount + decimals
pub const TRANSFER_CHECKED_DATA_LEN: usize = 10;

/// Whole tokens handed out per disbursement
pub const TOKENS_PER_DISBURSEMENT: u64 = 1;

/// Default bound for every RPC round trip, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Base URL used when building explorer links for submitted transactions
pub const EXPLORER_BASE_URL: &str = "https://explorer.solana.com/tx";

/// Returns true if `program_id` is one of the supported token programs.
pub fn is_token_program(program_id: &Pubkey) -> bool {
    *program_id == program_ids::TOKEN_PROGRAM_ID || *program_id == program_ids::TOKEN_2022_PROGRAM_ID
}
