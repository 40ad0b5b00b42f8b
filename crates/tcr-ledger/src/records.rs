//! Per-voter records persisted alongside listings and ballots.
//!
//! Both records carry the voting round they were written in: the
//! `challenged_at` height of the ballot that was live at the time. A record
//! from an earlier round never satisfies a later one.

use serde::{Deserialize, Serialize};
use tcr_types::{CommitmentHash, Vote};

/// A vote commitment, keyed by voter in the `commits` namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCommitment {
    pub digest: CommitmentHash,
    pub round: u64,
}

/// A revealed vote, keyed by voter in the `reveals` namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedVote {
    pub vote: Vote,
    pub round: u64,
}

impl RevealedVote {
    pub fn belongs_to(&self, round: u64) -> bool {
        self.round == round
    }
}
