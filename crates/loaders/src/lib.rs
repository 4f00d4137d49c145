//! # Protocol Loaders
//!
//! One loader per external protocol. A loader fetches the metadata accounts its
//! protocol publishes (reserves, options groups, order-book markets), decodes them
//! into `DecodedAccount`s and hands back a map keyed by address. The registry merges
//! the maps; loaders never see each other.

use crate::error::LoaderError;
use async_trait::async_trait;
use configuration::{LoadersConfig, ProgramIds};
use core_types::{DecodedAccount, Protocol, Pubkey};
use ledger_client::Ledger;
use std::collections::HashMap;
use std::sync::Arc;

pub mod error;

pub type AccountMap = HashMap<Pubkey, DecodedAccount>;

/// The contract every protocol loader fulfils.
#[async_trait]
pub trait ProtocolLoader: Send + Sync {
    /// Which protocol this loader speaks for.
    fn protocol(&self) -> Protocol;

    /// Fetches and decodes every metadata account in scope.
    async fn preload(&self) -> Result<AccountMap, LoaderError>;
}

/// Loads a protocol's metadata straight from the ledger.
///
/// With an empty address list the loader scans every account owned by the
/// protocol's program and keeps the ones whose layout it recognises. With an
/// explicit list it fetches exactly those accounts and treats anything missing or
/// unrecognised as an error.
pub struct LedgerLoader {
    protocol: Protocol,
    program_id: Pubkey,
    addresses: Vec<Pubkey>,
    ledger: Arc<dyn Ledger>,
}

impl LedgerLoader {
    pub fn new(
        protocol: Protocol,
        program_id: Pubkey,
        addresses: Vec<Pubkey>,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            protocol,
            program_id,
            addresses,
            ledger,
        }
    }

    async fn scan_program(&self) -> Result<AccountMap, LoaderError> {
        let accounts = self
            .ledger
            .fetch_program_accounts(&self.program_id)
            .await
            .map_err(|source| LoaderError::Ledger {
                protocol: self.protocol,
                source,
            })?;

        let mut decoded = AccountMap::new();
        let mut skipped = 0usize;
        for (address, data) in accounts {
            match DecodedAccount::decode(self.protocol, address, &data) {
                Ok(Some(account)) => {
                    decoded.insert(address, account);
                }
                Ok(None) => skipped += 1,
                Err(e) => {
                    // A single corrupt account should not hide the rest of the program.
                    tracing::warn!(
                        protocol = %self.protocol,
                        %address,
                        error = %e,
                        "Skipping undecodable account"
                    );
                    skipped += 1;
                }
            }
        }
        tracing::debug!(protocol = %self.protocol, skipped, "Program scan finished");
        Ok(decoded)
    }

    async fn load_listed(&self) -> Result<AccountMap, LoaderError> {
        let accounts = self
            .ledger
            .fetch_multiple_accounts(&self.addresses)
            .await
            .map_err(|source| LoaderError::Ledger {
                protocol: self.protocol,
                source,
            })?;

        let mut decoded = AccountMap::new();
        for (address, data) in accounts {
            let data = data.ok_or(LoaderError::MissingAccount {
                protocol: self.protocol,
                address,
            })?;
            let account = DecodedAccount::decode(self.protocol, address, &data)
                .map_err(|source| LoaderError::Decode {
                    protocol: self.protocol,
                    address,
                    source,
                })?
                .ok_or(LoaderError::UnexpectedLayout {
                    protocol: self.protocol,
                    address,
                })?;
            decoded.insert(address, account);
        }
        Ok(decoded)
    }
}

#[async_trait]
impl ProtocolLoader for LedgerLoader {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    async fn preload(&self) -> Result<AccountMap, LoaderError> {
        let accounts = if self.addresses.is_empty() {
            self.scan_program().await?
        } else {
            self.load_listed().await?
        };
        tracing::info!(
            protocol = %self.protocol,
            count = accounts.len(),
            "Loaded protocol accounts"
        );
        Ok(accounts)
    }
}

/// A loader over a fixed, already-decoded set of accounts.
///
/// Useful for pinning metadata that never changes, and for tests.
pub struct StaticLoader {
    protocol: Protocol,
    accounts: AccountMap,
}

impl StaticLoader {
    pub fn new(protocol: Protocol, accounts: impl IntoIterator<Item = DecodedAccount>) -> Self {
        Self {
            protocol,
            accounts: accounts
                .into_iter()
                .map(|account| (*account.address(), account))
                .collect(),
        }
    }
}

#[async_trait]
impl ProtocolLoader for StaticLoader {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    async fn preload(&self) -> Result<AccountMap, LoaderError> {
        Ok(self.accounts.clone())
    }
}

/// Builds the three ledger-backed loaders in registry merge order:
/// order-book, lending, options.
pub fn ledger_loaders(
    ledger: Arc<dyn Ledger>,
    programs: &ProgramIds,
    addresses: &ResolvedScopes,
) -> Vec<Arc<dyn ProtocolLoader>> {
    vec![
        Arc::new(LedgerLoader::new(
            Protocol::Orderbook,
            programs.orderbook,
            addresses.orderbook.clone(),
            ledger.clone(),
        )),
        Arc::new(LedgerLoader::new(
            Protocol::Lending,
            programs.lending,
            addresses.lending.clone(),
            ledger.clone(),
        )),
        Arc::new(LedgerLoader::new(
            Protocol::Options,
            programs.options,
            addresses.options.clone(),
            ledger,
        )),
    ]
}

/// Parsed `[loaders]` section.
#[derive(Debug, Clone, Default)]
pub struct ResolvedScopes {
    pub orderbook: Vec<Pubkey>,
    pub lending: Vec<Pubkey>,
    pub options: Vec<Pubkey>,
}

impl TryFrom<&LoadersConfig> for ResolvedScopes {
    type Error = configuration::error::ConfigError;

    fn try_from(config: &LoadersConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            orderbook: config.orderbook.addresses()?,
            lending: config.lending.addresses()?,
            options: config.options.addresses()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;
    use core_types::layout::{encode, RawMarket, RawReserve};
    use ledger_client::mock::MockLedger;

    fn reserve_data(available: u64) -> Vec<u8> {
        let mut raw = RawReserve::zeroed();
        raw.available_liquidity = available;
        encode(&raw)
    }

    #[tokio::test]
    async fn scan_keeps_only_recognised_layouts() {
        let ledger = Arc::new(MockLedger::new());
        let program = Pubkey::new_unique();
        let reserve = Pubkey::new_unique();
        ledger.set_account(reserve, program, reserve_data(42));
        // A user account owned by the same program.
        ledger.set_account(Pubkey::new_unique(), program, vec![9u8; 64]);
        // A reserve owned by someone else is out of scope.
        ledger.set_account(Pubkey::new_unique(), Pubkey::new_unique(), reserve_data(1));

        let loader = LedgerLoader::new(Protocol::Lending, program, vec![], ledger);
        let accounts = loader.preload().await.unwrap();

        assert_eq!(accounts.len(), 1);
        match &accounts[&reserve] {
            DecodedAccount::LendingReserve(r) => assert_eq!(r.available_liquidity, 42),
            other => panic!("unexpected account {other:?}"),
        }
    }

    #[tokio::test]
    async fn listed_account_missing_is_an_error() {
        let ledger = Arc::new(MockLedger::new());
        let missing = Pubkey::new_unique();
        let loader =
            LedgerLoader::new(Protocol::Lending, Pubkey::new_unique(), vec![missing], ledger);

        match loader.preload().await {
            Err(LoaderError::MissingAccount { address, .. }) => assert_eq!(address, missing),
            other => panic!("expected MissingAccount, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn listed_account_of_wrong_layout_is_an_error() {
        let ledger = Arc::new(MockLedger::new());
        let market = Pubkey::new_unique();
        ledger.set_account(market, Pubkey::new_unique(), encode(&RawMarket::zeroed()));
        let loader =
            LedgerLoader::new(Protocol::Lending, Pubkey::new_unique(), vec![market], ledger);

        assert!(matches!(
            loader.preload().await,
            Err(LoaderError::UnexpectedLayout { protocol: Protocol::Lending, .. })
        ));
    }
}
