//! Error types for balance operations.

use tcr_store::StoreError;
use tcr_types::Address;
use thiserror::Error;

/// Errors that can occur while reading or moving balances.
#[derive(Debug, Error)]
pub enum BankError {
    /// The account holds less than the amount to debit.
    #[error("insufficient funds: {address} has {available}{denom}, needs {needed}{denom}")]
    InsufficientFunds {
        address: Address,
        denom: String,
        needed: u64,
        available: u64,
    },

    /// A stored account record could not be decoded.
    #[error("corrupt account record for {address}: {reason}")]
    Corrupt { address: Address, reason: String },

    /// An account record could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl BankError {
    /// Codespace of every bank failure.
    pub const CODESPACE: &'static str = "bank";

    /// Stable numeric code of this failure within [`Self::CODESPACE`].
    pub fn code(&self) -> u32 {
        match self {
            Self::InsufficientFunds { .. } => 5,
            Self::Corrupt { .. } | Self::Serialization(_) | Self::Store(_) => 1,
        }
    }

    /// Returns `true` if this error means the store itself is broken.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InsufficientFunds { .. })
    }
}

/// Convenience type alias for balance operations.
pub type BankResult<T> = std::result::Result<T, BankError>;
