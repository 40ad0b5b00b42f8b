use tcr_store::{Namespace, StoreError};
use tcr_types::{Address, BallotPhase};

/// Errors produced by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("listing already exists: {identifier}")]
    AlreadyExists { identifier: String },

    #[error("listing not found: {identifier}")]
    NotFound { identifier: String },

    #[error("listing already challenged: {identifier}")]
    AlreadyChallenged { identifier: String },

    #[error("listing not challenged: {identifier}")]
    NotChallenged { identifier: String },

    #[error("revealed vote of {voter} on {identifier} does not match its commitment")]
    CommitmentMismatch { identifier: String, voter: Address },

    #[error("no ballot for listing: {identifier}")]
    BallotNotFound { identifier: String },

    #[error("ballot for {identifier} is in {actual} phase, expected {expected}")]
    WrongPhase {
        identifier: String,
        expected: BallotPhase,
        actual: BallotPhase,
    },

    #[error("{voter} already revealed on {identifier} this round")]
    AlreadyRevealed { identifier: String, voter: Address },

    /// A stored record could not be decoded, or records contradict each other.
    #[error("corrupt record in {namespace} namespace: {reason}")]
    Corrupt { namespace: Namespace, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Codespace of this failure: `registry` for domain rejections, `store`
    /// for a broken store.
    pub fn codespace(&self) -> &'static str {
        if self.is_fatal() {
            "store"
        } else {
            "registry"
        }
    }

    /// Stable numeric code of this failure within [`Self::codespace`].
    pub fn code(&self) -> u32 {
        match self {
            Self::AlreadyExists { .. } => 102,
            Self::NotFound { .. } => 103,
            Self::AlreadyChallenged { .. } => 104,
            Self::NotChallenged { .. } => 105,
            Self::CommitmentMismatch { .. } => 106,
            Self::BallotNotFound { .. } => 107,
            Self::WrongPhase { .. } => 109,
            Self::AlreadyRevealed { .. } => 110,
            Self::Corrupt { .. } | Self::Serialization(_) | Self::Store(_) => 1,
        }
    }

    /// Returns `true` if the store can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Corrupt { .. } | Self::Serialization(_) | Self::Store(_)
        )
    }
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
