use tcr_types::StdTx;

use crate::error::GateError;
use crate::stage::{codes, GateContext, GateStage, StageDecision};

/// The signer must hold at least the configured minimum bond.
pub struct MinimumBondStage;

impl GateStage for MinimumBondStage {
    fn name(&self) -> &str {
        "minimum-bond"
    }

    fn evaluate(&self, tx: &StdTx, context: &GateContext<'_>) -> Result<StageDecision, GateError> {
        let signer = tx.msg.signer();
        let denom = &context.config.bond_denom;
        let held = context.escrow.balance(context.store, &signer, denom)?;
        if held < context.config.min_bond {
            return Ok(StageDecision::reject(
                codes::INSUFFICIENT_BOND,
                format!(
                    "{signer} holds {held}{denom}, minimum bond is {}{denom}",
                    context.config.min_bond
                ),
            ));
        }
        Ok(StageDecision::Pass)
    }
}
