//! An in-memory `Ledger` for tests. Accounts are plain byte vectors keyed by address,
//! simulations never touch them, and every simulated or submitted transaction is
//! recorded so tests can inspect exactly what the client built.

use crate::error::LedgerError;
use crate::{CommitmentReceipt, Ledger, SimulationReport};
use async_trait::async_trait;
use chrono::Utc;
use core_types::Pubkey;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MockState {
    accounts: HashMap<Pubkey, (Pubkey, Vec<u8>)>,
    simulation_error: Option<String>,
    submit_error: Option<String>,
    simulated: Vec<Transaction>,
    submitted: Vec<Transaction>,
    blockhash_requests: usize,
    airdrops: Vec<(Pubkey, u64)>,
}

pub struct MockLedger {
    blockhash: Hash,
    state: Mutex<MockState>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            state: Mutex::new(MockState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores an account owned by `owner`, replacing any previous data.
    pub fn set_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.state().accounts.insert(address, (owner, data));
    }

    /// Makes every subsequent simulation report `error`.
    pub fn fail_simulations(&self, error: &str) {
        self.state().simulation_error = Some(error.to_string());
    }

    /// Makes every subsequent submission fail with `error`.
    pub fn fail_submissions(&self, error: &str) {
        self.state().submit_error = Some(error.to_string());
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub fn blockhash_requests(&self) -> usize {
        self.state().blockhash_requests
    }

    pub fn simulated(&self) -> Vec<Transaction> {
        self.state().simulated.clone()
    }

    pub fn submitted(&self) -> Vec<Transaction> {
        self.state().submitted.clone()
    }

    pub fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.state().airdrops.clone()
    }

    pub fn account_data(&self, address: &Pubkey) -> Option<Vec<u8>> {
        self.state().accounts.get(address).map(|(_, data)| data.clone())
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        self.state().blockhash_requests += 1;
        Ok(self.blockhash)
    }

    async fn fetch_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, LedgerError> {
        self.account_data(address)
            .ok_or(LedgerError::AccountNotFound(*address))
    }

    async fn fetch_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<(Pubkey, Option<Vec<u8>>)>, LedgerError> {
        Ok(addresses
            .iter()
            .map(|address| (*address, self.account_data(address)))
            .collect())
    }

    async fn fetch_program_accounts(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, LedgerError> {
        let mut accounts: Vec<(Pubkey, Vec<u8>)> = self
            .state()
            .accounts
            .iter()
            .filter(|(_, (owner, _))| owner == program_id)
            .map(|(address, (_, data))| (*address, data.clone()))
            .collect();
        accounts.sort_by_key(|(address, _)| *address);
        Ok(accounts)
    }

    async fn simulate(&self, transaction: &Transaction) -> Result<SimulationReport, LedgerError> {
        let mut state = self.state();
        state.simulated.push(transaction.clone());
        let instructions = transaction.message.instructions.len();
        let logs = (0..instructions)
            .map(|i| format!("Program log: instruction {i} processed"))
            .collect();

        Ok(SimulationReport {
            err: state.simulation_error.clone(),
            logs,
            units_consumed: Some(instructions as u64 * 5_000),
        })
    }

    async fn submit(&self, transaction: &Transaction) -> Result<CommitmentReceipt, LedgerError> {
        let mut state = self.state();
        if let Some(error) = &state.submit_error {
            return Err(LedgerError::Rejected(error.clone()));
        }
        state.submitted.push(transaction.clone());
        Ok(CommitmentReceipt {
            signature: transaction.signatures.first().copied().unwrap_or_default(),
            confirmed_at: Utc::now(),
        })
    }

    async fn request_test_funds(
        &self,
        recipient: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError> {
        self.state().airdrops.push((*recipient, lamports));
        Ok(Signature::new_unique())
    }
}
