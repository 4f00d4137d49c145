use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use solana_sdk::signature::Signature;

/// The outcome of a dry run. A failed simulation is a normal, inspectable value:
/// `err` carries the ledger's reason and `logs` whatever the programs printed
/// before failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub err: Option<String>,
    pub logs: Vec<String>,
    pub units_consumed: Option<u64>,
}

impl SimulationReport {
    pub fn succeeded(&self) -> bool {
        self.err.is_none()
    }
}

/// Proof that a transaction was submitted and confirmed at the client's commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitmentReceipt {
    #[serde(serialize_with = "serialize_display")]
    pub signature: Signature,
    pub confirmed_at: DateTime<Utc>,
}

fn serialize_display<S: Serializer>(value: &Signature, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
