//! # Ledger Client Crate
//!
//! The boundary between the vault client and the ledger. Everything above this crate
//! talks to the `Ledger` trait; `RpcLedger` binds it to a JSON-RPC node and, behind the
//! `mock` feature, `MockLedger` binds it to an in-memory store for tests.

use crate::error::LedgerError;
use async_trait::async_trait;
use chrono::Utc;
use configuration::Commitment;
use core_types::Pubkey;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSimulateTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod responses;

// --- Public API ---
pub use responses::{CommitmentReceipt, SimulationReport};

/// `getMultipleAccounts` accepts at most this many addresses per request.
const MAX_MULTIPLE_ACCOUNTS: usize = 100;

/// The abstract interface to the ledger.
/// Implementations may be a live RPC node or an in-memory fake; callers cannot tell.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fetches the most recent blockhash, the freshness marker every transaction carries.
    async fn latest_blockhash(&self) -> Result<Hash, LedgerError>;

    /// Fetches the raw data of one account. A missing account is an error.
    async fn fetch_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, LedgerError>;

    /// Fetches many accounts at once; missing accounts come back as `None`, in input order.
    async fn fetch_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<(Pubkey, Option<Vec<u8>>)>, LedgerError>;

    /// Fetches every account owned by `program_id`.
    async fn fetch_program_accounts(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, LedgerError>;

    /// Dry-runs a signed transaction without mutating ledger state.
    async fn simulate(&self, transaction: &Transaction) -> Result<SimulationReport, LedgerError>;

    /// Submits a signed transaction and waits for confirmation.
    async fn submit(&self, transaction: &Transaction) -> Result<CommitmentReceipt, LedgerError>;

    /// Requests test funds for `recipient`. Only meaningful on test clusters.
    async fn request_test_funds(
        &self,
        recipient: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError>;
}

/// A concrete implementation of the `Ledger` for a JSON-RPC node.
pub struct RpcLedger {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(url: String, commitment: Commitment) -> Self {
        let commitment = commitment_config(commitment);
        Self {
            client: RpcClient::new_with_commitment(url, commitment),
            commitment,
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

fn commitment_config(commitment: Commitment) -> CommitmentConfig {
    match commitment {
        Commitment::Processed => CommitmentConfig::processed(),
        Commitment::Confirmed => CommitmentConfig::confirmed(),
        Commitment::Finalized => CommitmentConfig::finalized(),
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?;
        tracing::debug!(%blockhash, last_valid_block_height, "Fetched latest blockhash");
        Ok(blockhash)
    }

    async fn fetch_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, LedgerError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await?;
        response
            .value
            .map(|account| account.data)
            .ok_or(LedgerError::AccountNotFound(*address))
    }

    async fn fetch_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<(Pubkey, Option<Vec<u8>>)>, LedgerError> {
        let mut accounts = Vec::with_capacity(addresses.len());
        for chunk in addresses.chunks(MAX_MULTIPLE_ACCOUNTS) {
            let response = self
                .client
                .get_multiple_accounts_with_commitment(chunk, self.commitment)
                .await?;
            accounts.extend(
                chunk
                    .iter()
                    .copied()
                    .zip(response.value.into_iter().map(|a| a.map(|a| a.data))),
            );
        }
        Ok(accounts)
    }

    async fn fetch_program_accounts(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, LedgerError> {
        let accounts = self.client.get_program_accounts(program_id).await?;
        tracing::debug!(%program_id, count = accounts.len(), "Fetched program accounts");
        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }

    async fn simulate(&self, transaction: &Transaction) -> Result<SimulationReport, LedgerError> {
        let config = RpcSimulateTransactionConfig {
            sig_verify: true,
            commitment: Some(self.commitment),
            ..RpcSimulateTransactionConfig::default()
        };
        let result = self
            .client
            .simulate_transaction_with_config(transaction, config)
            .await?
            .value;

        Ok(SimulationReport {
            err: result.err.map(|e| e.to_string()),
            logs: result.logs.unwrap_or_default(),
            units_consumed: result.units_consumed,
        })
    }

    async fn submit(&self, transaction: &Transaction) -> Result<CommitmentReceipt, LedgerError> {
        let signature = self.client.send_and_confirm_transaction(transaction).await?;
        Ok(CommitmentReceipt {
            signature,
            confirmed_at: Utc::now(),
        })
    }

    async fn request_test_funds(
        &self,
        recipient: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError> {
        let signature = self.client.request_airdrop(recipient, lamports).await?;
        tracing::info!(%recipient, lamports, %signature, "Requested test funds");
        Ok(signature)
    }
}
