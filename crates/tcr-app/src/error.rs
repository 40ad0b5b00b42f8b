use tcr_bank::BankError;
use tcr_gate::{GateError, AUTH_CODESPACE};
use tcr_ledger::RegistryError;
use tcr_store::StoreError;
use tcr_types::TypeError;
use thiserror::Error;

/// Why a transaction was not applied.
///
/// Every variant carries a stable `(codespace, code)` pair. Only
/// [`TxError::is_fatal`] errors indicate a broken store; all others are
/// ordinary rejections that left state untouched.
#[derive(Debug, Error)]
pub enum TxError {
    /// The message failed stateless validation.
    #[error("invalid message: {0}")]
    Invalid(#[from] TypeError),

    /// The authentication gate rejected the transaction.
    #[error("rejected by {stage} stage: {reason}")]
    Unauthorized {
        stage: String,
        code: u32,
        reason: String,
    },

    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Why a block could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// Heights must strictly increase; ballot rounds are keyed by height.
    #[error("block height {requested} does not follow {current}")]
    StaleHeight { current: u64, requested: u64 },
}

impl TxError {
    pub fn codespace(&self) -> &'static str {
        match self {
            Self::Invalid(TypeError::InvalidBond { .. } | TypeError::EmptyIdentifier) => {
                "registry"
            }
            Self::Invalid(_) | Self::Unauthorized { .. } => AUTH_CODESPACE,
            Self::Gate(GateError::Escrow(e)) | Self::Bank(e) if e.is_fatal() => "store",
            Self::Gate(_) => AUTH_CODESPACE,
            Self::Bank(_) => BankError::CODESPACE,
            Self::Registry(e) => e.codespace(),
            Self::Store(_) => "store",
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::Invalid(TypeError::InvalidBond { .. }) => 101,
            Self::Invalid(TypeError::EmptyIdentifier) => 111,
            Self::Invalid(_) => 1,
            Self::Unauthorized { code, .. } => *code,
            Self::Gate(GateError::Escrow(e)) | Self::Bank(e) => e.code(),
            Self::Gate(_) => 1,
            Self::Registry(e) => e.code(),
            Self::Store(_) => 1,
        }
    }

    /// Returns `true` if the store can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Invalid(_) | Self::Unauthorized { .. } => false,
            Self::Gate(GateError::Escrow(e)) | Self::Bank(e) => e.is_fatal(),
            Self::Gate(_) => false,
            Self::Registry(e) => e.is_fatal(),
            Self::Store(_) => true,
        }
    }
}
