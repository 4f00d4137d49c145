use composer::error::ComposeError;
use executor::ExecutorError;
use ledger_client::error::LedgerError;
use registry::RegistryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("The account registry has not been preloaded")]
    RegistryNotLoaded,

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Composition error: {0}")]
    Compose(#[from] ComposeError),

    #[error("Execution error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl ManagerError {
    /// True when a requested account identity or product does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            ManagerError::Registry(RegistryError::NotFound(_)) => true,
            ManagerError::Compose(e) => e.is_not_found(),
            _ => false,
        }
    }
}
