use core_types::{AccountKind, Pubkey};
use loaders::error::LoaderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Account {0} not found in the registry")]
    NotFound(Pubkey),

    #[error("Account {address} is a {found}, expected a {expected}")]
    KindMismatch {
        address: Pubkey,
        expected: AccountKind,
        found: AccountKind,
    },

    #[error("Loader failed during preload: {0}")]
    Loader(#[from] LoaderError),
}
