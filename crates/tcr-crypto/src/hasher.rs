use tcr_types::{CommitmentHash, Vote};

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"tcr-vote-v1"`) that is prepended
/// to every hash computation, so a vote and any other record with identical
/// bytes never share a digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for vote commitments.
    pub const VOTE: Self = Self {
        domain: "tcr-vote-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }
}

/// Compute the commitment a voter publishes before revealing `vote`.
///
/// The digest covers the canonical encoding of `(choice, nonce, weight)`.
pub fn commit_vote(vote: &Vote) -> Result<CommitmentHash, HasherError> {
    let bytes = vote
        .canonical_bytes()
        .map_err(|e| HasherError::Serialization(e.to_string()))?;
    Ok(CommitmentHash::from_hash(ContentHasher::VOTE.hash(&bytes)))
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(ContentHasher::VOTE.hash(b"hello"), ContentHasher::VOTE.hash(b"hello"));
    }

    #[test]
    fn vote_domain_is_prepended() {
        assert_ne!(ContentHasher::VOTE.hash(b"data"), *blake3::hash(b"data").as_bytes());
    }

    #[test]
    fn commitment_binds_nonce() {
        let a = commit_vote(&Vote::new(true, vec![1, 2, 3], 20)).unwrap();
        let b = commit_vote(&Vote::new(true, vec![9, 9, 9], 20)).unwrap();
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn commitment_is_deterministic(choice: bool, nonce in proptest::collection::vec(any::<u8>(), 0..32), weight: u64) {
            let vote = Vote::new(choice, nonce, weight);
            prop_assert_eq!(commit_vote(&vote).unwrap(), commit_vote(&vote.clone()).unwrap());
        }

        #[test]
        fn flipping_choice_changes_commitment(choice: bool, nonce in proptest::collection::vec(any::<u8>(), 0..32), weight: u64) {
            let a = commit_vote(&Vote::new(choice, nonce.clone(), weight)).unwrap();
            let b = commit_vote(&Vote::new(!choice, nonce, weight)).unwrap();
            prop_assert_ne!(a, b);
        }
    }
}
