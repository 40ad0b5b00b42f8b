use tcr_crypto::{Signature, VerifyingKey};
use tcr_types::StdTx;

use crate::error::GateError;
use crate::stage::{codes, GateContext, GateStage, StageDecision};

/// Exactly one signature must be attached.
pub struct SignatureCountStage;

impl GateStage for SignatureCountStage {
    fn name(&self) -> &str {
        "signature-count"
    }

    fn evaluate(&self, tx: &StdTx, _context: &GateContext<'_>) -> Result<StageDecision, GateError> {
        match tx.signatures.len() {
            1 => Ok(StageDecision::Pass),
            n => Ok(StageDecision::reject(
                codes::UNAUTHORIZED,
                format!("expected exactly one signature, found {n}"),
            )),
        }
    }
}

/// Structural check of the signed envelope.
///
/// The public key must be a valid 32-byte Ed25519 point and the signature
/// exactly 64 bytes.
pub struct EnvelopeStage;

impl GateStage for EnvelopeStage {
    fn name(&self) -> &str {
        "envelope"
    }

    fn evaluate(&self, tx: &StdTx, _context: &GateContext<'_>) -> Result<StageDecision, GateError> {
        let Some(sig) = tx.signatures.first() else {
            return Ok(StageDecision::reject(codes::INTERNAL, "missing signature"));
        };
        if let Err(e) = VerifyingKey::from_slice(&sig.pub_key) {
            return Ok(StageDecision::reject(
                codes::INTERNAL,
                format!("malformed public key: {e}"),
            ));
        }
        if let Err(e) = Signature::from_slice(&sig.signature) {
            return Ok(StageDecision::reject(
                codes::INTERNAL,
                format!("malformed signature: {e}"),
            ));
        }
        Ok(StageDecision::Pass)
    }
}
