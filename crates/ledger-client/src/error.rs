use core_types::Pubkey;
use solana_client::client_error::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("RPC request failed: {0}")]
    Rpc(#[from] ClientError),

    #[error("Account {0} does not exist on the ledger")]
    AccountNotFound(Pubkey),

    #[error("The ledger rejected the request: {0}")]
    Rejected(String),
}
