use crate::error::ExecutorError;
use crate::outcome::ExecutionOutcome;
use async_trait::async_trait;
use core_types::ExecutionMode;
use ledger_client::Ledger;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;
use std::sync::Arc;

/// Turns an ordered instruction list into one atomic transaction and runs it.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Builds, signs and simulates a transaction; in `Commit` mode also submits it.
    ///
    /// `signers[0]` pays the fee. All signers sign.
    async fn execute(
        &self,
        instructions: Vec<Instruction>,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ExecutorError>;
}

pub struct LedgerExecutor {
    ledger: Arc<dyn Ledger>,
}

impl LedgerExecutor {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    async fn build(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Transaction, ExecutorError> {
        let payer = signers.first().ok_or(ExecutorError::NoSigners)?.pubkey();
        if instructions.is_empty() {
            return Err(ExecutorError::EmptyTransaction);
        }

        let blockhash = self.ledger.latest_blockhash().await?;
        let message = Message::new(instructions, Some(&payer));
        let mut transaction = Transaction::new_unsigned(message);
        transaction.try_sign(signers, blockhash)?;
        Ok(transaction)
    }
}

#[async_trait]
impl Executor for LedgerExecutor {
    async fn execute(
        &self,
        instructions: Vec<Instruction>,
        signers: &[&Keypair],
        mode: ExecutionMode,
    ) -> Result<ExecutionOutcome, ExecutorError> {
        let transaction = self.build(&instructions, signers).await?;
        let signature = transaction.signatures[0];

        let simulation = self.ledger.simulate(&transaction).await?;
        tracing::debug!(
            %signature,
            instructions = instructions.len(),
            units = ?simulation.units_consumed,
            succeeded = simulation.succeeded(),
            "Transaction simulated"
        );

        if !mode.commits() {
            return Ok(ExecutionOutcome::Simulated(simulation));
        }

        if let Some(err) = &simulation.err {
            tracing::warn!(%signature, error = %err, "Simulation failed, submitting anyway");
        }

        let receipt = match self.ledger.submit(&transaction).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::error!(%signature, error = %e, "Transaction submission failed");
                return Err(ExecutorError::SubmissionFailed(e));
            }
        };
        tracing::info!(signature = %receipt.signature, "Transaction committed");

        Ok(ExecutionOutcome::Committed {
            receipt,
            simulation,
        })
    }
}
