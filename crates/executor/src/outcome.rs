use ledger_client::{CommitmentReceipt, SimulationReport};
use serde::Serialize;

/// What happened to a transaction.
///
/// Every execution is simulated; a committed one also carries the receipt. A
/// simulation that failed is still a `Simulated` outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Simulated(SimulationReport),
    Committed {
        receipt: CommitmentReceipt,
        simulation: SimulationReport,
    },
}

impl ExecutionOutcome {
    pub fn simulation(&self) -> &SimulationReport {
        match self {
            ExecutionOutcome::Simulated(report) => report,
            ExecutionOutcome::Committed { simulation, .. } => simulation,
        }
    }

    pub fn receipt(&self) -> Option<&CommitmentReceipt> {
        match self {
            ExecutionOutcome::Simulated(_) => None,
            ExecutionOutcome::Committed { receipt, .. } => Some(receipt),
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, ExecutionOutcome::Committed { .. })
    }
}
