use core_types::{CoreError, OptionKind, Pubkey};
use ledger_client::error::LedgerError;
use registry::RegistryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Registry lookup failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("No active {kind:?} product with strike {strike} in options group {group}")]
    NoMatchingProduct {
        group: Pubkey,
        strike: u64,
        kind: OptionKind,
    },

    #[error("Vault {0} does not exist on the ledger")]
    VaultNotFound(Pubkey),

    #[error("Vault {address} is malformed: {source}")]
    MalformedVault {
        address: Pubkey,
        #[source]
        source: CoreError,
    },

    #[error("Ledger error while reading vault state: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Invalid {field}: must be greater than zero")]
    InvalidAmount { field: &'static str },

    #[error("Invalid fee of {0} bps: must not exceed 10000")]
    InvalidFee(u16),

    #[error("At least one signer is required")]
    MissingSigner,
}

impl ComposeError {
    /// True for the "requested identity or product does not exist" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ComposeError::Registry(RegistryError::NotFound(_))
                | ComposeError::NoMatchingProduct { .. }
        )
    }
}
