use ledger_client::error::LedgerError;
use solana_sdk::signer::SignerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("A transaction needs at least one signer to pay its fee")]
    NoSigners,

    #[error("Refusing to build a transaction without instructions")]
    EmptyTransaction,

    #[error("Failed to sign the transaction: {0}")]
    Signing(#[from] SignerError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(#[source] LedgerError),
}
