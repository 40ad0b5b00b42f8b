use tcr_crypto::commit_vote;
use tcr_store::{KvStore, Namespace};
use tcr_types::{
    Address, Ballot, BallotPhase, CommitmentHash, Listing, ListingStatus, Vote, Voter,
};
use tracing::debug;

use crate::codec::{decode, encode, listing_key, voter_key, voter_prefix};
use crate::error::{RegistryError, RegistryResult};
use crate::records::{RevealedVote, StoredCommitment};

/// Typed accessor over the registry namespaces of a [`KvStore`].
///
/// The ledger holds no state: every operation reads and writes only the store
/// it is handed. Failed operations write nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegistryLedger;

impl RegistryLedger {
    pub fn new() -> Self {
        Self
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Load the listing stored under `identifier`, if any.
    ///
    /// Fails only if the stored record cannot be decoded.
    pub fn get_listing(
        &self,
        store: &dyn KvStore,
        identifier: &str,
    ) -> RegistryResult<Option<Listing>> {
        self.read(store, Namespace::Listings, &listing_key(identifier)?)
    }

    /// Load the most recent ballot for `identifier`, live or resolved.
    pub fn get_ballot(
        &self,
        store: &dyn KvStore,
        identifier: &str,
    ) -> RegistryResult<Option<Ballot>> {
        self.read(store, Namespace::Ballots, &listing_key(identifier)?)
    }

    pub fn get_commitment(
        &self,
        store: &dyn KvStore,
        voter: &Voter,
    ) -> RegistryResult<Option<StoredCommitment>> {
        self.read(store, Namespace::Commitments, &voter_key(voter)?)
    }

    pub fn get_vote(
        &self,
        store: &dyn KvStore,
        voter: &Voter,
    ) -> RegistryResult<Option<RevealedVote>> {
        self.read(store, Namespace::Reveals, &voter_key(voter)?)
    }

    /// Every listing, in key order.
    pub fn listings(&self, store: &dyn KvStore) -> RegistryResult<Vec<Listing>> {
        store
            .scan_prefix(Namespace::Listings, &[])?
            .iter()
            .map(|(_, bytes)| decode(Namespace::Listings, bytes))
            .collect()
    }

    /// Votes revealed on `identifier` in voting round `round`, in voter key
    /// order.
    pub fn revealed_votes(
        &self,
        store: &dyn KvStore,
        identifier: &str,
        round: u64,
    ) -> RegistryResult<Vec<(Address, Vote)>> {
        let mut votes = Vec::new();
        for (key, bytes) in store.scan_prefix(Namespace::Reveals, &voter_prefix(identifier)?)? {
            let voter: Voter = decode(Namespace::Reveals, &key)?;
            let revealed: RevealedVote = decode(Namespace::Reveals, &bytes)?;
            if revealed.belongs_to(round) {
                votes.push((voter.owner, revealed.vote));
            }
        }
        Ok(votes)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Store a new pending listing.
    ///
    /// Fails with [`RegistryError::AlreadyExists`] if `identifier` is taken.
    pub fn add_listing(
        &self,
        store: &mut dyn KvStore,
        identifier: &str,
        owner: Address,
        bond: u64,
        height: u64,
    ) -> RegistryResult<Listing> {
        if self.get_listing(&*store, identifier)?.is_some() {
            return Err(RegistryError::AlreadyExists {
                identifier: identifier.to_string(),
            });
        }
        let listing = Listing::pending(identifier, owner, bond, height);
        self.put_listing(store, &listing)?;
        debug!(identifier, owner = %owner.short_id(), bond, height, "listing added");
        Ok(listing)
    }

    /// Put a listing under challenge and open a fresh ballot for it.
    ///
    /// Any resolved ballot from an earlier challenge is overwritten.
    pub fn challenge_listing(
        &self,
        store: &mut dyn KvStore,
        owner: Address,
        challenger: Address,
        identifier: &str,
        bond: u64,
        height: u64,
    ) -> RegistryResult<Ballot> {
        let mut listing = self.require_listing(&*store, identifier)?;
        if listing.is_challenged() {
            return Err(RegistryError::AlreadyChallenged {
                identifier: identifier.to_string(),
            });
        }
        listing.status = ListingStatus::Challenged;
        let ballot = Ballot::open(identifier, owner, challenger, bond, height);
        self.put_listing(store, &listing)?;
        self.put_ballot(store, &ballot)?;
        debug!(
            identifier,
            challenger = %challenger.short_id(),
            bond,
            round = height,
            "listing challenged"
        );
        Ok(ballot)
    }

    /// Record `owner`'s vote commitment on the live ballot of `identifier`.
    ///
    /// Overwrites any earlier commitment by the same voter.
    pub fn commit_listing(
        &self,
        store: &mut dyn KvStore,
        owner: Address,
        identifier: &str,
        commitment: CommitmentHash,
    ) -> RegistryResult<StoredCommitment> {
        let ballot = self.live_ballot(&*store, identifier)?;
        expect_phase(&ballot, BallotPhase::Commit)?;

        let stored = StoredCommitment {
            digest: commitment,
            round: ballot.challenged_at,
        };
        let key = voter_key(&Voter::new(owner, identifier))?;
        store.set(Namespace::Commitments, &key, encode(&stored)?)?;
        debug!(
            identifier,
            voter = %owner.short_id(),
            digest = %commitment.short_hex(),
            "vote committed"
        );
        Ok(stored)
    }

    /// Reveal `owner`'s vote and add its weight to the live ballot.
    ///
    /// The vote is accepted only if its recomputed commitment equals the one
    /// stored for the current round, and only once per voter per round.
    pub fn reveal_listing(
        &self,
        store: &mut dyn KvStore,
        owner: Address,
        identifier: &str,
        choice: bool,
        nonce: &[u8],
        weight: u64,
    ) -> RegistryResult<Ballot> {
        let mut ballot = self.live_ballot(&*store, identifier)?;
        expect_phase(&ballot, BallotPhase::Reveal)?;
        let round = ballot.challenged_at;

        let voter = Voter::new(owner, identifier);
        let vote = Vote::new(choice, nonce, weight);
        let digest =
            commit_vote(&vote).map_err(|e| RegistryError::Serialization(e.to_string()))?;

        let matches = self
            .get_commitment(&*store, &voter)?
            .is_some_and(|stored| stored.round == round && stored.digest.as_bytes() == digest.as_bytes());
        if !matches {
            return Err(RegistryError::CommitmentMismatch {
                identifier: identifier.to_string(),
                voter: owner,
            });
        }
        if self
            .get_vote(&*store, &voter)?
            .is_some_and(|prev| prev.belongs_to(round))
        {
            return Err(RegistryError::AlreadyRevealed {
                identifier: identifier.to_string(),
                voter: owner,
            });
        }

        let revealed = RevealedVote { vote, round };
        store.set(Namespace::Reveals, &voter_key(&voter)?, encode(&revealed)?)?;
        ballot.record(choice, weight);
        self.put_ballot(store, &ballot)?;
        debug!(
            identifier,
            voter = %owner.short_id(),
            choice,
            weight,
            approve = ballot.approve,
            deny = ballot.deny,
            "vote revealed"
        );
        Ok(ballot)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn read<T: serde::de::DeserializeOwned>(
        &self,
        store: &dyn KvStore,
        namespace: Namespace,
        key: &[u8],
    ) -> RegistryResult<Option<T>> {
        store
            .get(namespace, key)?
            .map(|bytes| decode(namespace, &bytes))
            .transpose()
    }

    fn require_listing(&self, store: &dyn KvStore, identifier: &str) -> RegistryResult<Listing> {
        self.get_listing(store, identifier)?
            .ok_or_else(|| RegistryError::NotFound {
                identifier: identifier.to_string(),
            })
    }

    /// The ballot of a challenged listing.
    fn live_ballot(&self, store: &dyn KvStore, identifier: &str) -> RegistryResult<Ballot> {
        let listing = self.require_listing(store, identifier)?;
        if !listing.is_challenged() {
            return Err(RegistryError::NotChallenged {
                identifier: identifier.to_string(),
            });
        }
        self.get_ballot(store, identifier)?
            .ok_or_else(|| RegistryError::BallotNotFound {
                identifier: identifier.to_string(),
            })
    }

    pub(crate) fn put_listing(
        &self,
        store: &mut dyn KvStore,
        listing: &Listing,
    ) -> RegistryResult<()> {
        store.set(
            Namespace::Listings,
            &listing_key(&listing.identifier)?,
            encode(listing)?,
        )?;
        Ok(())
    }

    pub(crate) fn put_ballot(&self, store: &mut dyn KvStore, ballot: &Ballot) -> RegistryResult<()> {
        store.set(
            Namespace::Ballots,
            &listing_key(&ballot.identifier)?,
            encode(ballot)?,
        )?;
        Ok(())
    }

    pub(crate) fn remove_listing(
        &self,
        store: &mut dyn KvStore,
        identifier: &str,
    ) -> RegistryResult<()> {
        store.delete(Namespace::Listings, &listing_key(identifier)?)?;
        Ok(())
    }
}

fn expect_phase(ballot: &Ballot, expected: BallotPhase) -> RegistryResult<()> {
    if ballot.phase != expected {
        return Err(RegistryError::WrongPhase {
            identifier: ballot.identifier.clone(),
            expected,
            actual: ballot.phase,
        });
    }
    Ok(())
}
