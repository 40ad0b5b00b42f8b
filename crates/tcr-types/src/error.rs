use thiserror::Error;

/// Errors produced by type operations and stateless message validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("must submit a positive bond in {expected}, got {amount} {denom}")]
    InvalidBond {
        expected: &'static str,
        denom: String,
        amount: u64,
    },

    #[error("listing identifier must not be empty")]
    EmptyIdentifier,
}
