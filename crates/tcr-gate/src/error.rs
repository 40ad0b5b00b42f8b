use tcr_bank::BankError;

/// Errors that stop gate evaluation without a decision.
///
/// A rejected transaction is not an error; it is reported through
/// [`GateDecision::Rejected`](crate::GateDecision::Rejected).
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A stage returned an unexpected error.
    #[error("stage error in '{stage}': {message}")]
    StageError { stage: String, message: String },

    /// A balance could not be read.
    #[error("escrow error: {0}")]
    Escrow(#[from] BankError),
}

impl GateError {
    /// Create a stage error with a name and message.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageError {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
