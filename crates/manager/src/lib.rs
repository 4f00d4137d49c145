//! # Vault Manager
//!
//! The facade callers use. It owns the registry slot, the composer and the executor,
//! and exposes one method per vault operation. Each method snapshots the current
//! registry once, composes the instructions, and hands them to the executor in the
//! requested [`ExecutionMode`].
//!
//! There are no retries and no rollback: a failed step surfaces as a
//! [`ManagerError`] and the ledger is the source of truth for what happened.

use composer::InstructionComposer;
use configuration::ProgramIds;
use core_types::{ExecutionMode, Pubkey};
use executor::{Executor, LedgerExecutor};
use ledger_client::Ledger;
use loaders::ProtocolLoader;
use registry::AccountRegistry;
use solana_sdk::instruction::Instruction;
use solana_sdk::signature::{Keypair, Signature};
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod error;

pub use composer::{BidOrder, CreateVaultArgs};
pub use error::ManagerError;
pub use executor::ExecutionOutcome;

pub struct VaultManager {
    ledger: Arc<dyn Ledger>,
    loaders: Vec<Arc<dyn ProtocolLoader>>,
    composer: InstructionComposer,
    executor: Arc<dyn Executor>,
    registry: RwLock<Option<Arc<AccountRegistry>>>,
}

impl VaultManager {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        loaders: Vec<Arc<dyn ProtocolLoader>>,
        programs: ProgramIds,
    ) -> Self {
        let executor = Arc::new(LedgerExecutor::new(ledger.clone()));
        Self::with_executor(ledger, loaders, programs, executor)
    }

    /// Like [`VaultManager::new`] with a caller-supplied executor.
    pub fn with_executor(
        ledger: Arc<dyn Ledger>,
        loaders: Vec<Arc<dyn ProtocolLoader>>,
        programs: ProgramIds,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            composer: InstructionComposer::new(ledger.clone(), programs),
            ledger,
            loaders,
            executor,
            registry: RwLock::new(None),
        }
    }

    pub fn programs(&self) -> &ProgramIds {
        self.composer.programs()
    }

    /// Runs every loader and installs the merged registry.
    ///
    /// Calling it again refreshes: a new registry is built and swapped in whole, so
    /// operations already in flight keep the snapshot they started with. On failure
    /// the previous registry stays in place.
    pub async fn preload(&self) -> Result<Arc<AccountRegistry>, ManagerError> {
        let registry = Arc::new(AccountRegistry::preload(&self.loaders).await?);
        *self.registry.write().await = Some(registry.clone());
        Ok(registry)
    }

    /// The current registry snapshot.
    pub async fn registry(&self) -> Result<Arc<AccountRegistry>, ManagerError> {
        self.registry
            .read()
            .await
            .clone()
            .ok_or(ManagerError::RegistryNotLoaded)
    }

    /// Address of the vault `authority` would create over `reserve`.
    pub fn vault_address(&self, reserve: &Pubkey, authority: &Pubkey) -> Pubkey {
        composer::pda::vault_address(&self.programs().vault, reserve, authority).0
    }

    async fn run(
        &self,
        operation: &'static str,
        instructions: Vec<Instruction>,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let outcome = self.executor.execute(instructions, signers, mode).await?;
        tracing::info!(
            operation,
            ?mode,
            succeeded = outcome.simulation().succeeded(),
            committed = outcome.is_committed(),
            "Vault operation finished"
        );
        Ok(outcome)
    }

    pub async fn create_vault(
        &self,
        args: CreateVaultArgs,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let authority = composer::operator(signers)?;
        let ixs = self.composer.create_vault(&registry, &authority, &args)?;
        self.run("create_vault", ixs, signers, mode).await
    }

    pub async fn deposit(
        &self,
        vault: &Pubkey,
        amount: u64,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let user = composer::operator(signers)?;
        let ixs = self.composer.deposit(&registry, vault, &user, amount).await?;
        self.run("deposit", ixs, signers, mode).await
    }

    pub async fn withdraw(
        &self,
        vault: &Pubkey,
        shares: u64,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let user = composer::operator(signers)?;
        let ixs = self.composer.withdraw(&registry, vault, &user, shares).await?;
        self.run("withdraw", ixs, signers, mode).await
    }

    pub async fn init_open_orders(
        &self,
        vault: &Pubkey,
        market: &Pubkey,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let authority = composer::operator(signers)?;
        let ixs = self
            .composer
            .init_open_orders(&registry, vault, &authority, market)
            .await?;
        self.run("init_open_orders", ixs, signers, mode).await
    }

    pub async fn harvest_yield(
        &self,
        vault: &Pubkey,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let authority = composer::operator(signers)?;
        let ixs = self.composer.harvest_yield(&registry, vault, &authority).await?;
        self.run("harvest_yield", ixs, signers, mode).await
    }

    pub async fn reinvest_lending(
        &self,
        vault: &Pubkey,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let authority = composer::operator(signers)?;
        let ixs = self
            .composer
            .reinvest_lending(&registry, vault, &authority)
            .await?;
        self.run("reinvest_lending", ixs, signers, mode).await
    }

    pub async fn reinvest_options(
        &self,
        vault: &Pubkey,
        amount: u64,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let authority = composer::operator(signers)?;
        let ixs = self
            .composer
            .reinvest_options(&registry, vault, &authority, amount)
            .await?;
        self.run("reinvest_options", ixs, signers, mode).await
    }

    pub async fn place_bid(
        &self,
        vault: &Pubkey,
        order: BidOrder,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let authority = composer::operator(signers)?;
        let ixs = self
            .composer
            .place_bid(&registry, vault, &authority, &order)
            .await?;
        self.run("place_bid", ixs, signers, mode).await
    }

    pub async fn redeem_options(
        &self,
        vault: &Pubkey,
        amount: u64,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let authority = composer::operator(signers)?;
        let ixs = self
            .composer
            .redeem_options(&registry, vault, &authority, amount)
            .await?;
        self.run("redeem_options", ixs, signers, mode).await
    }

    pub async fn swap_to_underlying(
        &self,
        vault: &Pubkey,
        amount: u64,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        // Needs no registry accounts, but operations stay gated on a preload.
        self.registry().await?;
        let authority = composer::operator(signers)?;
        let ixs = self
            .composer
            .swap_to_underlying(vault, &authority, amount)
            .await?;
        self.run("swap_to_underlying", ixs, signers, mode).await
    }

    pub async fn swap_to_usdc(
        &self,
        vault: &Pubkey,
        amount: u64,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ManagerError> {
        let registry = self.registry().await?;
        let authority = composer::operator(signers)?;
        let ixs = self
            .composer
            .swap_to_usdc(&registry, vault, &authority, amount)
            .await?;
        self.run("swap_to_usdc", ixs, signers, mode).await
    }

    /// Requests test funds from the cluster's faucet. Test clusters only.
    pub async fn request_test_funds(
        &self,
        recipient: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ManagerError> {
        let signature = self.ledger.request_test_funds(recipient, lamports).await?;
        tracing::info!(%recipient, lamports, %signature, "Test funds requested");
        Ok(signature)
    }
}
