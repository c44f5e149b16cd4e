use crate::address::{associated_token_address, parse_address};
use crate::config::Cluster;
use crate::errors::{AirdropError, Result};
use crate::instructions::plan_disbursement;
use crate::ledger::{LedgerReader, Submitter};
use crate::transaction::{assemble, FeeSettings};
use crate::utils::{format_token_amount, one_token};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Per-process settings of a [`DisbursementService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub mint: Pubkey,
    pub cluster: Cluster,
    /// Node the ledger talks to; localnet explorer links point here.
    pub rpc_url: String,
    pub fees: FeeSettings,
}

/// Outcome of a disbursement accepted by the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisbursementReceipt {
    pub signature: Signature,
    pub explorer_url: String,
    pub destination_account: Pubkey,
    pub amount: u64,
    pub decimals: u8,
    pub created_destination: bool,
}

/// Snapshot of the custodial token account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustodyStatus {
    pub custodial: Pubkey,
    pub mint: Pubkey,
    pub source_account: Pubkey,
    pub decimals: u8,
    pub balance: u64,
    /// Whole-token disbursements the balance still covers.
    pub disbursements_remaining: u64,
}

/// Entry point for disbursing tokens from the custodial wallet.
///
/// The service is an immutable context built once at startup. Cloning is
/// cheap and clones share the ledger connection and the signing key, so any
/// number of requests can run concurrently without locking. Two requests may
/// both pass the balance check while only one whole token is left; the ledger
/// then accepts one transfer and the other comes back as
/// [`AirdropError::SubmissionRejected`].
pub struct DisbursementService<L> {
    ledger: Arc<L>,
    credential: Arc<Keypair>,
    settings: ServiceSettings,
}

impl<L> Clone for DisbursementService<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            credential: Arc::clone(&self.credential),
            settings: self.settings.clone(),
        }
    }
}

impl<L: LedgerReader + Submitter> DisbursementService<L> {
    pub fn new(ledger: Arc<L>, credential: Arc<Keypair>, settings: ServiceSettings) -> Self {
        Self {
            ledger,
            credential,
            settings,
        }
    }

    pub fn custodial_address(&self) -> Pubkey {
        self.credential.pubkey()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Sends one whole token to the wallet named by `destination`.
    ///
    /// The address is parsed before any ledger access, and every validation
    /// failure aborts before anything is signed or submitted. The custodial
    /// wallet itself is refused as a destination. No retry is
    /// attempted; a rejected submission is returned to the caller as is.
    #[instrument(skip(self), fields(mint = %self.settings.mint))]
    pub async fn disburse(&self, destination: &str) -> Result<DisbursementReceipt> {
        let result = self.try_disburse(destination).await;
        match &result {
            Ok(receipt) => info!(
                signature = %receipt.signature,
                destination_account = %receipt.destination_account,
                amount = receipt.amount,
                created_destination = receipt.created_destination,
                "disbursement submitted"
            ),
            Err(err) => warn!(error = %err, class = ?err.class(), "disbursement failed"),
        }
        result
    }

    async fn try_disburse(&self, destination: &str) -> Result<DisbursementReceipt> {
        let wallet = parse_address(destination)?;
        let custodial = self.custodial_address();
        if wallet == custodial {
            return Err(AirdropError::DestinationIsCustodial(wallet));
        }

        let plan =
            plan_disbursement(self.ledger.as_ref(), &custodial, &wallet, &self.settings.mint).await?;

        let checkpoint = self.ledger.latest_checkpoint().await?;
        let signed = assemble(
            &plan.instructions,
            &self.credential,
            checkpoint,
            &self.settings.fees,
        )?;

        let signature = self.ledger.submit(&signed.wire).await?;
        if signature != signed.signature {
            return Err(AirdropError::Transport(format!(
                "node acknowledged {signature} but {} was submitted",
                signed.signature
            )));
        }

        Ok(DisbursementReceipt {
            explorer_url: self
                .settings
                .cluster
                .explorer_url(&signature, &self.settings.rpc_url),
            signature,
            destination_account: plan.destination_account,
            amount: plan.raw_amount,
            decimals: plan.decimals,
            created_destination: plan.creates_destination,
        })
    }

    /// Reads the custodial token account without building anything.
    #[instrument(skip(self), fields(mint = %self.settings.mint))]
    pub async fn inspect(&self) -> Result<CustodyStatus> {
        let mint = self.settings.mint;
        let custodial = self.custodial_address();
        let mint_info = self.ledger.mint_info(&mint).await?;
        let source_account = associated_token_address(&custodial, &mint, &mint_info.token_program);

        let balance = if self.ledger.account_exists(&source_account).await? {
            self.ledger.token_balance(&source_account).await?
        } else {
            warn!(%source_account, "custodial token account does not exist");
            0
        };
        let per_disbursement = one_token(mint_info.decimals)?;

        info!(
            %source_account,
            balance = %format_token_amount(balance, mint_info.decimals),
            "custody inspected"
        );
        Ok(CustodyStatus {
            custodial,
            mint,
            source_account,
            decimals: mint_info.decimals,
            balance,
            disbursements_remaining: balance / per_disbursement,
        })
    }
}
