use std::time::Duration;

use tcr_bank::BondEscrow;
use tcr_store::KvStore;
use tcr_types::StdTx;

use crate::config::GateConfig;
use crate::error::GateError;

/// Codespace of every gate rejection.
pub const AUTH_CODESPACE: &str = "auth";

/// Rejection codes within [`AUTH_CODESPACE`].
pub mod codes {
    /// Malformed signed envelope.
    pub const INTERNAL: u32 = 1;
    /// Wrong number of signatures.
    pub const UNAUTHORIZED: u32 = 4;
    /// The signing key does not belong to the message's signer.
    pub const SIGNER_MISMATCH: u32 = 11;
    /// The signature does not verify.
    pub const INVALID_SIGNATURE: u32 = 12;
    /// The signer's balance is below the minimum bond.
    pub const INSUFFICIENT_BOND: u32 = 13;
}

// ---------------------------------------------------------------------------
// StageDecision
// ---------------------------------------------------------------------------

/// The outcome of a single gate stage evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    /// The stage passed; proceed to the next stage.
    Pass,
    /// The stage failed; the transaction is rejected with `code`.
    Reject { code: u32, reason: String },
}

impl StageDecision {
    pub fn reject(code: u32, reason: impl Into<String>) -> Self {
        Self::Reject {
            code,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the decision is `Pass`.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns `true` if the decision is `Reject`.
    pub fn is_reject(&self) -> bool {
        matches!(self, Self::Reject { .. })
    }
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// Recorded result from a completed stage evaluation.
#[derive(Clone, Debug)]
pub struct StageResult {
    /// Name of the stage that produced this result.
    pub stage_name: String,
    pub passed: bool,
    /// Rejection reason, if the stage failed.
    pub reason: Option<String>,
    /// Wall-clock time the stage took to evaluate.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// Read-only state available to every gate stage.
pub struct GateContext<'a> {
    /// Committed state the transaction is checked against.
    pub store: &'a dyn KvStore,
    /// Balance lookups for the minimum-bond check.
    pub escrow: &'a dyn BondEscrow,
    pub config: &'a GateConfig,
}

impl<'a> GateContext<'a> {
    pub fn new(store: &'a dyn KvStore, escrow: &'a dyn BondEscrow, config: &'a GateConfig) -> Self {
        Self {
            store,
            escrow,
            config,
        }
    }
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// A single evaluation stage in the gate pipeline.
///
/// Stages are evaluated in order. Each stage receives the transaction and a
/// shared context and returns a pass/reject decision. Stages never write.
///
/// The trait is object-safe and `Send + Sync` so stages can be stored in
/// a `Vec<Box<dyn GateStage>>`.
pub trait GateStage: Send + Sync {
    /// Human-readable name of this stage (e.g., "signature-count").
    fn name(&self) -> &str;

    /// Evaluate the transaction and return a decision.
    fn evaluate(&self, tx: &StdTx, context: &GateContext<'_>) -> Result<StageDecision, GateError>;
}
