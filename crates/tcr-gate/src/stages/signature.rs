use tcr_crypto::{Signature, VerifyingKey};
use tcr_types::{StdSignature, StdTx};

use crate::error::GateError;
use crate::stage::{codes, GateContext, GateStage, StageDecision};

fn parse(sig: &StdSignature) -> Option<(VerifyingKey, Signature)> {
    let key = VerifyingKey::from_slice(&sig.pub_key).ok()?;
    let signature = Signature::from_slice(&sig.signature).ok()?;
    Some((key, signature))
}

/// The sole signer must be the account the message declares.
pub struct SignerStage;

impl GateStage for SignerStage {
    fn name(&self) -> &str {
        "signer"
    }

    fn evaluate(&self, tx: &StdTx, _context: &GateContext<'_>) -> Result<StageDecision, GateError> {
        let Some((key, _)) = tx.signatures.first().and_then(parse) else {
            return Ok(StageDecision::reject(codes::INTERNAL, "malformed envelope"));
        };
        let expected = tx.msg.signer();
        let actual = key.to_address();
        if actual != expected {
            return Ok(StageDecision::reject(
                codes::SIGNER_MISMATCH,
                format!("signed by {actual}, message declares {expected}"),
            ));
        }
        Ok(StageDecision::Pass)
    }
}

/// The signature must verify over the message's canonical sign bytes.
pub struct SignatureStage;

impl GateStage for SignatureStage {
    fn name(&self) -> &str {
        "signature"
    }

    fn evaluate(&self, tx: &StdTx, _context: &GateContext<'_>) -> Result<StageDecision, GateError> {
        let Some((key, signature)) = tx.signatures.first().and_then(parse) else {
            return Ok(StageDecision::reject(codes::INTERNAL, "malformed envelope"));
        };
        let bytes = tx
            .msg
            .sign_bytes()
            .map_err(|e| GateError::stage(self.name(), e.to_string()))?;
        match key.verify(&bytes, &signature) {
            Ok(()) => Ok(StageDecision::Pass),
            Err(e) => Ok(StageDecision::reject(
                codes::INVALID_SIGNATURE,
                format!("signature verification failed: {e}"),
            )),
        }
    }
}
