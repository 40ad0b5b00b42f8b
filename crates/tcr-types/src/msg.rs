use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::coin::Coin;
use crate::digest::CommitmentHash;
use crate::error::TypeError;

/// Propose a new listing, staking `bond`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeMsg {
    pub owner: Address,
    pub identifier: String,
    pub bond: Coin,
}

/// Challenge an existing listing, staking a counter-bond.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeMsg {
    pub challenger: Address,
    pub identifier: String,
    pub bond: Coin,
}

/// Commit to a hidden vote on a challenged listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMsg {
    pub owner: Address,
    pub identifier: String,
    pub commitment: CommitmentHash,
}

/// Reveal a previously committed vote. `bond.amount` is the vote weight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealMsg {
    pub owner: Address,
    pub identifier: String,
    pub choice: bool,
    pub nonce: Vec<u8>,
    pub bond: Coin,
}

/// Every transaction message the registry understands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryMsg {
    Propose(ProposeMsg),
    Challenge(ChallengeMsg),
    Commit(CommitMsg),
    Reveal(RevealMsg),
}

impl RegistryMsg {
    pub fn propose(owner: Address, identifier: impl Into<String>, bond: Coin) -> Self {
        Self::Propose(ProposeMsg {
            owner,
            identifier: identifier.into(),
            bond,
        })
    }

    pub fn challenge(challenger: Address, identifier: impl Into<String>, bond: Coin) -> Self {
        Self::Challenge(ChallengeMsg {
            challenger,
            identifier: identifier.into(),
            bond,
        })
    }

    pub fn commit(owner: Address, identifier: impl Into<String>, commitment: CommitmentHash) -> Self {
        Self::Commit(CommitMsg {
            owner,
            identifier: identifier.into(),
            commitment,
        })
    }

    pub fn reveal(
        owner: Address,
        identifier: impl Into<String>,
        choice: bool,
        nonce: impl Into<Vec<u8>>,
        bond: Coin,
    ) -> Self {
        Self::Reveal(RevealMsg {
            owner,
            identifier: identifier.into(),
            choice,
            nonce: nonce.into(),
            bond,
        })
    }

    /// Short name of the message kind, used for logging and receipts.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Propose(_) => "propose",
            Self::Challenge(_) => "challenge",
            Self::Commit(_) => "commit",
            Self::Reveal(_) => "reveal",
        }
    }

    /// The account that must sign this message.
    pub fn signer(&self) -> Address {
        match self {
            Self::Propose(m) => m.owner,
            Self::Challenge(m) => m.challenger,
            Self::Commit(m) => m.owner,
            Self::Reveal(m) => m.owner,
        }
    }

    /// The listing this message targets.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Propose(m) => &m.identifier,
            Self::Challenge(m) => &m.identifier,
            Self::Commit(m) => &m.identifier,
            Self::Reveal(m) => &m.identifier,
        }
    }

    /// The bond carried by this message, if any.
    pub fn bond(&self) -> Option<&Coin> {
        match self {
            Self::Propose(m) => Some(&m.bond),
            Self::Challenge(m) => Some(&m.bond),
            Self::Commit(_) => None,
            Self::Reveal(m) => Some(&m.bond),
        }
    }

    /// Stateless checks that run before authentication and dispatch.
    pub fn validate_basic(&self) -> Result<(), TypeError> {
        if self.identifier().is_empty() {
            return Err(TypeError::EmptyIdentifier);
        }
        match self.bond() {
            Some(bond) => bond.validate_bond(),
            None => Ok(()),
        }
    }

    /// Canonical bytes covered by the transaction signature.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::derive(&[1u8; 32])
    }

    #[test]
    fn signer_follows_message_kind() {
        let challenger = Address::derive(&[2u8; 32]);
        assert_eq!(
            RegistryMsg::propose(owner(), "foo", Coin::registry(10)).signer(),
            owner()
        );
        assert_eq!(
            RegistryMsg::challenge(challenger, "foo", Coin::registry(10)).signer(),
            challenger
        );
    }

    #[test]
    fn validate_basic_rejects_bad_bond() {
        let msg = RegistryMsg::propose(owner(), "foo", Coin::new("steak", 10));
        assert!(matches!(msg.validate_basic(), Err(TypeError::InvalidBond { .. })));

        let msg = RegistryMsg::reveal(owner(), "foo", true, vec![1], Coin::registry(0));
        assert!(matches!(msg.validate_basic(), Err(TypeError::InvalidBond { .. })));
    }

    #[test]
    fn validate_basic_rejects_empty_identifier() {
        let msg = RegistryMsg::commit(owner(), "", CommitmentHash::from_hash([0; 32]));
        assert_eq!(msg.validate_basic(), Err(TypeError::EmptyIdentifier));
    }

    #[test]
    fn commit_carries_no_bond() {
        let msg = RegistryMsg::commit(owner(), "foo", CommitmentHash::from_hash([0; 32]));
        assert!(msg.bond().is_none());
        assert!(msg.validate_basic().is_ok());
    }

    #[test]
    fn sign_bytes_are_deterministic_and_distinct() {
        let a = RegistryMsg::propose(owner(), "foo", Coin::registry(10));
        let b = RegistryMsg::propose(owner(), "bar", Coin::registry(10));
        assert_eq!(a.sign_bytes().unwrap(), a.clone().sign_bytes().unwrap());
        assert_ne!(a.sign_bytes().unwrap(), b.sign_bytes().unwrap());
    }

    #[test]
    fn kind_names() {
        let msg = RegistryMsg::reveal(owner(), "foo", false, vec![], Coin::registry(1));
        assert_eq!(msg.kind(), "reveal");
        assert_eq!(msg.identifier(), "foo");
    }
}
