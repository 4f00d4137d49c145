use core_types::{CoreError, Protocol, Pubkey};
use ledger_client::error::LedgerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Ledger error while loading {protocol} accounts: {source}")]
    Ledger {
        protocol: Protocol,
        #[source]
        source: LedgerError,
    },

    #[error("Failed to decode {protocol} account {address}: {source}")]
    Decode {
        protocol: Protocol,
        address: Pubkey,
        #[source]
        source: CoreError,
    },

    #[error("Configured {protocol} account {address} does not exist")]
    MissingAccount { protocol: Protocol, address: Pubkey },

    #[error("Configured account {address} is not a {protocol} metadata account")]
    UnexpectedLayout { protocol: Protocol, address: Pubkey },
}
