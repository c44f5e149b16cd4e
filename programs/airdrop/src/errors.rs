use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AirdropError>;

/// Everything that can go wrong while disbursing a token.
#[derive(Debug, Error)]
pub enum AirdropError {
    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),
    #[error("Destination {0} is the custodial wallet")]
    DestinationIsCustodial(Pubkey),
    #[error("Custodial token account {0} does not exist")]
    SourceAccountMissing(Pubkey),
    #[error("Mint {0} is unavailable")]
    MintUnavailable(Pubkey),
    #[error("Token account {0} is unavailable")]
    AccountUnavailable(Pubkey),
    #[error("Airdrop exhausted: balance {balance} is below {required}")]
    InsufficientFunds { balance: u64, required: u64 },
    #[error("Amount for {decimals} decimals does not fit in u64")]
    AmountOverflow { decimals: u8 },
    #[error("Transaction has no instructions")]
    EmptyTransaction,
    #[error("Signing failed: {0}")]
    SigningFailure(String),
    #[error("Submission rejected: {reason}")]
    SubmissionRejected { reason: String },
    #[error("Ledger transport error: {0}")]
    Transport(String),
    #[error("Invalid signing credential: {0}")]
    Credential(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// How a caller should treat an [`AirdropError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input from the requester.
    Caller,
    /// The custodial account ran dry; try again later.
    Exhausted,
    /// The custodial setup is broken.
    Misconfigured,
    /// Network or consensus rejected the attempt; safe to retry.
    Retryable,
    /// The process must not keep serving.
    Fatal,
}

impl AirdropError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AirdropError::InvalidAddress(_) | AirdropError::DestinationIsCustodial(_) => {
                ErrorClass::Caller
            }
            AirdropError::InsufficientFunds { .. } => ErrorClass::Exhausted,
            AirdropError::SourceAccountMissing(_)
            | AirdropError::MintUnavailable(_)
            | AirdropError::AccountUnavailable(_)
            | AirdropError::AmountOverflow { .. }
            | AirdropError::EmptyTransaction
            | AirdropError::Config(_) => ErrorClass::Misconfigured,
            AirdropError::SubmissionRejected { .. } | AirdropError::Transport(_) => {
                ErrorClass::Retryable
            }
            AirdropError::SigningFailure(_) | AirdropError::Credential(_) => ErrorClass::Fatal,
        }
    }

    /// Whether the error stems from the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self.class(), ErrorClass::Caller | ErrorClass::Exhausted)
    }
}

impl From<reqwest::Error> for AirdropError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AirdropError::Transport(format!("request timed out: {err}"))
        } else {
            AirdropError::Transport(err.to_string())
        }
    }
}
