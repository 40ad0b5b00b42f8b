use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::TypeError;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Lifecycle state of a registry listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    /// Proposed, waiting out the application stage.
    Pending,
    /// Under an open challenge; a live [`Ballot`] exists.
    Challenged,
    /// Accepted onto the registry.
    Whitelisted,
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Challenged => write!(f, "Challenged"),
            Self::Whitelisted => write!(f, "Whitelisted"),
        }
    }
}

/// A registry entry staked by its owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Globally unique key of the entry.
    pub identifier: String,
    /// Account that proposed the entry and staked `bond`.
    pub owner: Address,
    pub status: ListingStatus,
    /// Whether the entry is shown as part of the registry.
    pub display: bool,
    /// Tokens staked by the owner.
    pub bond: u64,
    /// Block height at which the listing was proposed.
    pub applied_at: u64,
}

impl Listing {
    /// A freshly proposed listing.
    pub fn pending(identifier: impl Into<String>, owner: Address, bond: u64, height: u64) -> Self {
        Self {
            identifier: identifier.into(),
            owner,
            status: ListingStatus::Pending,
            display: false,
            bond,
            applied_at: height,
        }
    }

    pub fn is_challenged(&self) -> bool {
        self.status == ListingStatus::Challenged
    }

    pub fn is_whitelisted(&self) -> bool {
        self.status == ListingStatus::Whitelisted
    }
}

// ---------------------------------------------------------------------------
// Ballot
// ---------------------------------------------------------------------------

/// Result of a resolved ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The challenge failed; the listing stays on the registry.
    Kept,
    /// The challenge succeeded; the listing was removed.
    Removed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kept => write!(f, "Kept"),
            Self::Removed => write!(f, "Removed"),
        }
    }
}

/// Voting phase of a ballot.
///
/// Phases only move forward: `Commit -> Reveal -> Resolved`. The transition
/// is driven by block height in the resolution step, never by handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallotPhase {
    /// Voters submit hash commitments.
    Commit,
    /// Voters reveal the votes behind their commitments.
    Reveal,
    /// Tallied; bonds have been redistributed.
    Resolved(Verdict),
}

impl BallotPhase {
    /// `true` while the ballot still accepts commitments or reveals.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Resolved(_))
    }
}

impl fmt::Display for BallotPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit => write!(f, "Commit"),
            Self::Reveal => write!(f, "Reveal"),
            Self::Resolved(verdict) => write!(f, "Resolved({verdict})"),
        }
    }
}

/// The tally for one challenge on one listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub identifier: String,
    /// Owner of the challenged listing.
    pub owner: Address,
    pub challenger: Address,
    /// Revealed weight voting to keep the listing.
    pub approve: u64,
    /// Revealed weight voting to remove the listing.
    pub deny: u64,
    /// Tokens staked by the challenger.
    pub bond: u64,
    /// Block height of the challenge. Also identifies the voting round.
    pub challenged_at: u64,
    pub phase: BallotPhase,
}

impl Ballot {
    /// A fresh ballot with no revealed weight, open for commitments.
    pub fn open(
        identifier: impl Into<String>,
        owner: Address,
        challenger: Address,
        bond: u64,
        height: u64,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            owner,
            challenger,
            approve: 0,
            deny: 0,
            bond,
            challenged_at: height,
            phase: BallotPhase::Commit,
        }
    }

    /// Add revealed weight to one side of the tally.
    pub fn record(&mut self, choice: bool, weight: u64) {
        if choice {
            self.approve = self.approve.saturating_add(weight);
        } else {
            self.deny = self.deny.saturating_add(weight);
        }
    }
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

/// One participant's right to vote on one listing's active ballot.
///
/// The identifier is the first field so that the canonical encodings of all
/// voters on the same listing share a common key prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voter {
    pub identifier: String,
    pub owner: Address,
}

impl Voter {
    pub fn new(owner: Address, identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            owner,
        }
    }
}

/// A revealed vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// `true` keeps the listing, `false` removes it.
    pub choice: bool,
    /// Blinding bytes chosen by the voter at commit time.
    pub nonce: Vec<u8>,
    /// Tokens staked behind the vote.
    pub weight: u64,
}

impl Vote {
    pub fn new(choice: bool, nonce: impl Into<Vec<u8>>, weight: u64) -> Self {
        Self {
            choice,
            nonce: nonce.into(),
            weight,
        }
    }

    /// Canonical byte encoding that commitments are computed over.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, TypeError> {
        bincode::serialize(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}
