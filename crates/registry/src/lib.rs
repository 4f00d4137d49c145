//! # Account Registry
//!
//! The merged, read-only view of every protocol's metadata accounts. A registry is
//! built once by [`AccountRegistry::preload`] and never mutated afterwards; refreshing
//! means building a new one and swapping it in wholesale.
//!
//! Lookups are fail-fast: an address that no loader contributed is a
//! [`RegistryError::NotFound`], never a default value.

use core_types::{
    AccountKind, DecodedAccount, LendingReserve, OptionsGroup, OrderbookMarket, Protocol, Pubkey,
};
use futures::future::try_join_all;
use loaders::{AccountMap, ProtocolLoader};
use std::collections::HashMap;
use std::sync::Arc;

pub mod error;

pub use error::RegistryError;

#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    accounts: HashMap<Pubkey, DecodedAccount>,
    overwritten: usize,
}

impl AccountRegistry {
    /// Runs every loader and merges their outputs in the order given.
    ///
    /// The loaders' network round-trips overlap, but the merge is always applied in
    /// slice order so "last writer wins" is deterministic.
    pub async fn preload(loaders: &[Arc<dyn ProtocolLoader>]) -> Result<Self, RegistryError> {
        let maps = try_join_all(loaders.iter().map(|loader| async move {
            let accounts = loader.preload().await?;
            Ok::<_, RegistryError>((loader.protocol(), accounts))
        }))
        .await?;

        let registry = Self::merge(maps);
        tracing::info!(
            accounts = registry.len(),
            overwritten = registry.overwritten,
            "Account registry preloaded"
        );
        Ok(registry)
    }

    /// Merges per-protocol maps. On a duplicate address the later map wins and a
    /// warning is logged; distinct protocols should never collide.
    pub fn merge(maps: impl IntoIterator<Item = (Protocol, AccountMap)>) -> Self {
        let mut accounts = HashMap::new();
        let mut overwritten = 0;
        for (protocol, map) in maps {
            for (address, account) in map {
                let incoming = account.kind();
                if let Some(previous) = accounts.insert(address, account) {
                    overwritten += 1;
                    tracing::warn!(
                        %address,
                        %protocol,
                        previous = %previous.kind(),
                        incoming = %incoming,
                        "Duplicate account identity across loaders, keeping the later one"
                    );
                }
            }
        }
        Self {
            accounts,
            overwritten,
        }
    }

    /// Returns the decoded account stored at `address`.
    pub fn get(&self, address: &Pubkey) -> Result<&DecodedAccount, RegistryError> {
        self.accounts
            .get(address)
            .ok_or(RegistryError::NotFound(*address))
    }

    pub fn reserve(&self, address: &Pubkey) -> Result<&LendingReserve, RegistryError> {
        match self.get(address)? {
            DecodedAccount::LendingReserve(reserve) => Ok(reserve),
            other => Err(mismatch(address, AccountKind::LendingReserve, other)),
        }
    }

    pub fn options_group(&self, address: &Pubkey) -> Result<&OptionsGroup, RegistryError> {
        match self.get(address)? {
            DecodedAccount::OptionsGroup(group) => Ok(group),
            other => Err(mismatch(address, AccountKind::OptionsGroup, other)),
        }
    }

    pub fn market(&self, address: &Pubkey) -> Result<&OrderbookMarket, RegistryError> {
        match self.get(address)? {
            DecodedAccount::OrderbookMarket(market) => Ok(market),
            other => Err(mismatch(address, AccountKind::OrderbookMarket, other)),
        }
    }

    pub fn accounts(&self) -> &HashMap<Pubkey, DecodedAccount> {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// How many identities were contributed by more than one loader.
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }
}

fn mismatch(address: &Pubkey, expected: AccountKind, found: &DecodedAccount) -> RegistryError {
    RegistryError::KindMismatch {
        address: *address,
        expected,
        found: found.kind(),
    }
}
