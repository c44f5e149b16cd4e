#![allow(dead_code)]

use airdrop::config::Cluster;
use airdrop::constants::program_ids::TOKEN_PROGRAM_ID;
use airdrop::ledger::{LedgerAccount, LedgerReader, Submitter};
use airdrop::transaction::FeeSettings;
use airdrop::{AirdropError, DisbursementService, Result, ServiceSettings};
use async_trait::async_trait;
use litesvm::LiteSVM;
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::convert::TryInto;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------
pub const INITIAL_LAMPORTS: u64 = 1_000_000_000;
pub const LOCAL_RPC_URL: &str = "http://localhost:9100";

// ---------------------------------------------------------------------------
// In-process ledger
// ---------------------------------------------------------------------------
type Job = Box<dyn FnOnce(&mut LiteSVM) + Send>;

/// LiteSVM-backed ledger. The VM lives on its own thread and is driven
/// through a job queue, so the handle is `Send + Sync` like a real RPC client.
pub struct SvmLedger {
    jobs: Mutex<mpsc::Sender<Job>>,
    reads: AtomicUsize,
    submissions: AtomicUsize,
}

impl SvmLedger {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        thread::spawn(move || {
            // Default programs include SPL Token, Token-2022 and the ATA program.
            let mut svm = LiteSVM::new();
            for job in rx {
                job(&mut svm);
            }
        });
        Self {
            jobs: Mutex::new(tx),
            reads: AtomicUsize::new(0),
            submissions: AtomicUsize::new(0),
        }
    }

    pub fn with_svm<R, F>(&self, f: F) -> R
    where
        R: Send + 'static,
        F: FnOnce(&mut LiteSVM) -> R + Send + 'static,
    {
        let (reply_tx, reply_rx) = mpsc::channel();
        let job: Job = Box::new(move |svm| {
            let _ = reply_tx.send(f(svm));
        });
        self.jobs.lock().unwrap().send(job).expect("svm thread stopped");
        reply_rx.recv().expect("svm thread dropped the reply")
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerReader for SvmLedger {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<LedgerAccount>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let address = *address;
        let account = self.with_svm(move |svm| svm.get_account(&address));
        Ok(account.map(|account| LedgerAccount {
            owner: account.owner,
            lamports: account.lamports,
            data: account.data,
        }))
    }

    async fn latest_checkpoint(&self) -> Result<Hash> {
        Ok(self.with_svm(|svm| svm.latest_blockhash()))
    }
}

#[async_trait]
impl Submitter for SvmLedger {
    async fn submit(&self, wire_transaction: &[u8]) -> Result<Signature> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        let tx: Transaction = bincode::deserialize(wire_transaction)
            .map_err(|e| AirdropError::SubmissionRejected { reason: format!("malformed: {e}") })?;
        self.with_svm(move |svm| match svm.send_transaction(tx) {
            Ok(meta) => Ok(meta.signature),
            Err(failed) => Err(AirdropError::SubmissionRejected {
                reason: format!("{:?}", failed.err),
            }),
        })
    }
}

// ---------------------------------------------------------------------------
// ATA derivation
// ---------------------------------------------------------------------------
pub fn get_associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    airdrop::address::associated_token_address(wallet, mint, &TOKEN_PROGRAM_ID)
}

// ---------------------------------------------------------------------------
// Account creation helpers
// ---------------------------------------------------------------------------
pub fn fund(ledger: &SvmLedger, wallet: &Pubkey, lamports: u64) {
    let wallet = *wallet;
    ledger
        .with_svm(move |svm| {
            svm.airdrop(&wallet, lamports)
                .map(|_| ())
                .map_err(|failed| format!("{:?}", failed.err))
        })
        .expect("airdrop failed");
}

pub fn create_mint(ledger: &SvmLedger, decimals: u8, mint_authority: &Pubkey, token_program: &Pubkey) -> Pubkey {
    let mint = Keypair::new().pubkey();

    // SPL Token Mint layout (82 bytes), shared by Token-2022 mints without extensions
    // COption<Pubkey> uses a 4-byte LE tag (0=None, 1=Some) + 32-byte Pubkey
    let mut mint_data = vec![0u8; 82];
    // [0..4]:   mint_authority COption tag
    mint_data[0..4].copy_from_slice(&1u32.to_le_bytes());
    // [4..36]:  mint_authority Pubkey
    mint_data[4..36].copy_from_slice(mint_authority.as_ref());
    // [36..44]: supply = 0 (already zero)
    // [44]:     decimals
    mint_data[44] = decimals;
    // [45]:     is_initialized
    mint_data[45] = 1;
    // [46..82]: freeze_authority = None (already zero)

    let owner = *token_program;
    ledger
        .with_svm(move |svm| {
            svm.set_account(
                mint,
                Account {
                    executable: false,
                    data: mint_data,
                    lamports: INITIAL_LAMPORTS,
                    owner,
                    rent_epoch: 0,
                },
            )
            .map_err(|e| format!("{e:?}"))
        })
        .unwrap();

    mint
}

pub fn create_token_account(
    ledger: &SvmLedger,
    mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    token_program: &Pubkey,
) -> Pubkey {
    let ata = airdrop::address::associated_token_address(owner, mint, token_program);

    // SPL Token Account layout (165 bytes)
    let mut token_data = vec![0u8; 165];
    token_data[0..32].copy_from_slice(mint.as_ref()); // mint
    token_data[32..64].copy_from_slice(owner.as_ref()); // owner
    token_data[64..72].copy_from_slice(&amount.to_le_bytes()); // amount
    token_data[108] = 1; // state = Initialized

    let program = *token_program;
    ledger
        .with_svm(move |svm| {
            svm.set_account(
                ata,
                Account {
                    executable: false,
                    data: token_data,
                    lamports: INITIAL_LAMPORTS,
                    owner: program,
                    rent_epoch: 0,
                },
            )
            .map_err(|e| format!("{e:?}"))
        })
        .unwrap();

    ata
}

pub fn get_token_balance(ledger: &SvmLedger, token_account: &Pubkey) -> u64 {
    let token_account = *token_account;
    let account = ledger
        .with_svm(move |svm| svm.get_account(&token_account))
        .expect("account not found");
    u64::from_le_bytes(account.data[64..72].try_into().unwrap())
}

pub fn account_exists(ledger: &SvmLedger, address: &Pubkey) -> bool {
    let address = *address;
    ledger.with_svm(move |svm| svm.get_account(&address).is_some())
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------
pub struct Harness {
    pub ledger: Arc<SvmLedger>,
    pub custodial: Arc<Keypair>,
    pub mint: Pubkey,
    pub source_account: Pubkey,
    pub service: DisbursementService<SvmLedger>,
}

/// Funded custodial wallet holding `balance` raw units of a fresh mint.
pub fn setup_with(decimals: u8, balance: u64, token_program: &Pubkey) -> Harness {
    let ledger = Arc::new(SvmLedger::new());
    let custodial = Arc::new(Keypair::new());
    fund(&ledger, &custodial.pubkey(), 100 * INITIAL_LAMPORTS);

    let mint = create_mint(&ledger, decimals, &custodial.pubkey(), token_program);
    let source_account = create_token_account(&ledger, &mint, &custodial.pubkey(), balance, token_program);

    let service = DisbursementService::new(
        Arc::clone(&ledger),
        Arc::clone(&custodial),
        ServiceSettings {
            mint,
            cluster: Cluster::Localnet,
            rpc_url: LOCAL_RPC_URL.to_string(),
            fees: FeeSettings::default(),
        },
    );

    Harness {
        ledger,
        custodial,
        mint,
        source_account,
        service,
    }
}

pub fn setup(decimals: u8, balance: u64) -> Harness {
    setup_with(decimals, balance, &TOKEN_PROGRAM_ID)
}
