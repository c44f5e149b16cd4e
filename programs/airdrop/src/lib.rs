//! Custodial SPL token disburser.
//!
//! Sends exactly one whole token of a configured mint from a custodial
//! wallet to any wallet address a caller names. The destination's associated
//! token account is created in the same transaction when it does not exist.
//!
//! # Flow
//! [`DisbursementService::disburse`] drives one attempt per call:
//! - parse the destination ([`address::parse_address`]),
//! - read mint and balances and build the instructions
//!   ([`instructions::plan_disbursement`]),
//! - fetch a fresh blockhash, sign and serialize ([`transaction::assemble`]),
//! - broadcast ([`ledger::Submitter`]).
//!
//! Nothing is cached between calls and nothing is retried. Transport and
//! surrounding concerns (HTTP, authentication, rate limiting) belong to the
//! caller.
//!
//! # Security
//! - The signing key is loaded once at startup ([`credential`]) and never
//!   derived from request data.
//! - Balance and account checks run before signing, so a failed validation
//!   never reaches the network.

pub mod address;
pub mod config;
pub mod constants;
pub mod credential;
pub mod errors;
pub mod instructions;
pub mod ledger;
pub mod service;
pub mod transaction;
pub mod utils;

pub use errors::{AirdropError, ErrorClass, Result};
pub use service::{CustodyStatus, DisbursementReceipt, DisbursementService, ServiceSettings};
