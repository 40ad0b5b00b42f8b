use std::time::{Duration, Instant};

use tcr_bank::BondEscrow;
use tcr_store::KvStore;
use tcr_types::StdTx;
use tracing::debug;

use crate::config::GateConfig;
use crate::error::GateError;
use crate::stage::{GateContext, GateStage, StageDecision, StageResult};
use crate::stages::{
    EnvelopeStage, MinimumBondStage, SignatureCountStage, SignatureStage, SignerStage,
};

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

/// Final decision of the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Accepted,
    Rejected {
        stage: String,
        code: u32,
        reason: String,
    },
}

/// The outcome of running a transaction through the full gate pipeline.
#[derive(Clone, Debug)]
pub struct GateResult {
    pub decision: GateDecision,
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
    /// Total wall-clock time for the pipeline evaluation.
    pub elapsed: Duration,
}

impl GateResult {
    /// Returns `true` if the transaction was accepted.
    pub fn is_accepted(&self) -> bool {
        self.decision == GateDecision::Accepted
    }

    /// Rejection code, if the transaction was rejected.
    pub fn code(&self) -> Option<u32> {
        match &self.decision {
            GateDecision::Accepted => None,
            GateDecision::Rejected { code, .. } => Some(*code),
        }
    }
}

// ---------------------------------------------------------------------------
// AnteGate
// ---------------------------------------------------------------------------

/// The authentication gate: a pipeline of stages every transaction must
/// pass before any handler runs.
pub struct AnteGate {
    stages: Vec<Box<dyn GateStage>>,
    config: GateConfig,
}

impl AnteGate {
    /// Create a new gate with an empty pipeline.
    pub fn new(config: GateConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Create a gate with the standard pipeline:
    /// SignatureCount -> Envelope -> Signer -> Signature -> MinimumBond
    pub fn with_default_stages(config: GateConfig) -> Self {
        let mut gate = Self::new(config);
        gate.add_stage(Box::new(SignatureCountStage));
        gate.add_stage(Box::new(EnvelopeStage));
        gate.add_stage(Box::new(SignerStage));
        gate.add_stage(Box::new(SignatureStage));
        gate.add_stage(Box::new(MinimumBondStage));
        gate
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Evaluate a transaction through the full pipeline.
    ///
    /// The pipeline is **fail-fast**: the first stage that rejects stops
    /// evaluation. Stages only read `store`.
    pub fn evaluate(
        &self,
        tx: &StdTx,
        store: &dyn KvStore,
        escrow: &dyn BondEscrow,
    ) -> Result<GateResult, GateError> {
        let pipeline_start = Instant::now();
        let context = GateContext::new(store, escrow, &self.config);
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_start = Instant::now();
            let decision = stage.evaluate(tx, &context)?;
            let elapsed = stage_start.elapsed();

            let reason = match &decision {
                StageDecision::Pass => None,
                StageDecision::Reject { reason, .. } => Some(reason.clone()),
            };
            debug!(stage = stage.name(), passed = decision.is_pass(), ?reason, "gate stage");

            let result = StageResult {
                stage_name: stage.name().to_string(),
                passed: decision.is_pass(),
                reason,
                elapsed,
            };
            stage_results.push(result);

            if let StageDecision::Reject { code, reason } = decision {
                return Ok(GateResult {
                    decision: GateDecision::Rejected {
                        stage: stage.name().to_string(),
                        code,
                        reason,
                    },
                    stage_results,
                    elapsed: pipeline_start.elapsed(),
                });
            }
        }

        Ok(GateResult {
            decision: GateDecision::Accepted,
            stage_results,
            elapsed: pipeline_start.elapsed(),
        })
    }
}
