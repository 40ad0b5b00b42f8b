//! Height-driven resolution of listings and ballots.
//!
//! Block height moves registry state in exactly three ways:
//!
//! 1. A pending listing whose application stage has elapsed is whitelisted.
//! 2. A ballot whose commit stage has elapsed moves to the reveal phase.
//! 3. A ballot whose reveal stage has elapsed is tallied, and the disputed
//!    bonds are split between the winning party and the winning voters.
//!
//! Resolution reports the tokens it frees as [`Payout`]s and never credits
//! them itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use tcr_store::{KvStore, Namespace};
use tcr_types::{Address, Ballot, BallotPhase, Listing, ListingStatus, Verdict, Vote};
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};
use crate::params::RegistryParams;
use crate::registry::RegistryLedger;

/// Why a payout was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutReason {
    /// The winning challenger's own bond, returned.
    BondReturn,
    /// The winning party's share of the forfeited bond.
    Dispensation,
    /// A winning voter's revealed weight, returned.
    StakeReturn,
    /// A winning voter's share of the voter pool.
    VoterReward,
    /// Pool remainder that could not be split among voters.
    Remainder,
}

/// Tokens owed to one account by a resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub recipient: Address,
    pub amount: u64,
    pub reason: PayoutReason,
}

/// A state change made by resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Whitelisted,
    RevealOpened,
    Resolved(Verdict),
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whitelisted => write!(f, "whitelisted"),
            Self::RevealOpened => write!(f, "reveal opened"),
            Self::Resolved(verdict) => write!(f, "resolved ({verdict})"),
        }
    }
}

/// The outcome of advancing one listing at one height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub identifier: String,
    pub height: u64,
    /// The last state change applied.
    pub transition: Transition,
    pub payouts: Vec<Payout>,
}

impl Settlement {
    /// Sum of all payouts.
    pub fn total_paid(&self) -> u64 {
        self.payouts
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.amount))
    }

    /// Sum of payouts to `recipient`.
    pub fn paid_to(&self, recipient: &Address) -> u64 {
        self.payouts
            .iter()
            .filter(|p| &p.recipient == recipient)
            .fold(0u64, |acc, p| acc.saturating_add(p.amount))
    }
}

/// Decide a ballot and compute every payout it frees.
///
/// `listing_bond` is the owner's stake; `votes` are the revealed votes of the
/// ballot's round. The listing is kept when nobody revealed, or when the
/// approve share strictly exceeds `quorum_pct` percent of the revealed
/// weight.
pub fn tally(
    ballot: &Ballot,
    listing_bond: u64,
    votes: &[(Address, Vote)],
    params: &RegistryParams,
) -> (Verdict, Vec<Payout>) {
    let approve = u128::from(ballot.approve);
    let total = approve + u128::from(ballot.deny);
    let kept = total == 0 || approve * 100 > u128::from(params.quorum_pct) * total;

    let (verdict, winner, forfeited) = if kept {
        (Verdict::Kept, ballot.owner, ballot.bond)
    } else {
        (Verdict::Removed, ballot.challenger, listing_bond)
    };

    let mut payouts = Vec::new();
    let mut pay = |recipient: Address, amount: u128, reason: PayoutReason| {
        let amount = u64::try_from(amount).unwrap_or(u64::MAX);
        if amount > 0 {
            payouts.push(Payout {
                recipient,
                amount,
                reason,
            });
        }
    };

    if !kept {
        pay(ballot.challenger, u128::from(ballot.bond), PayoutReason::BondReturn);
    }

    let forfeited = u128::from(forfeited);
    let dispensation = forfeited * u128::from(params.dispensation_pct) / 100;
    pay(winner, dispensation, PayoutReason::Dispensation);

    let (winning, losing): (Vec<_>, Vec<_>) =
        votes.iter().partition(|(_, vote)| vote.choice == kept);
    let winning_weight: u128 = winning.iter().map(|(_, v)| u128::from(v.weight)).sum();
    let pool = forfeited - dispensation
        + losing.iter().map(|(_, v)| u128::from(v.weight)).sum::<u128>();

    let mut distributed = 0u128;
    if winning_weight > 0 {
        for (voter, vote) in &winning {
            let weight = u128::from(vote.weight);
            let reward = pool * weight / winning_weight;
            distributed += reward;
            pay(*voter, weight, PayoutReason::StakeReturn);
            pay(*voter, reward, PayoutReason::VoterReward);
        }
    }
    pay(winner, pool - distributed, PayoutReason::Remainder);

    (verdict, payouts)
}

impl RegistryLedger {
    /// Apply every state change due at `height` to the listing `identifier`.
    ///
    /// Returns `None` if nothing changed. A ballot whose commit and reveal
    /// stages have both elapsed is moved to the reveal phase and tallied in
    /// the same call; the settlement then reports the tally.
    pub fn advance(
        &self,
        store: &mut dyn KvStore,
        identifier: &str,
        height: u64,
        params: &RegistryParams,
    ) -> RegistryResult<Option<Settlement>> {
        let Some(mut listing) = self.get_listing(&*store, identifier)? else {
            return Ok(None);
        };

        match listing.status {
            ListingStatus::Pending => {
                if height < params.whitelist_height(listing.applied_at) {
                    return Ok(None);
                }
                listing.status = ListingStatus::Whitelisted;
                listing.display = true;
                self.put_listing(store, &listing)?;
                info!(identifier, height, "listing whitelisted");
                Ok(Some(Settlement {
                    identifier: identifier.to_string(),
                    height,
                    transition: Transition::Whitelisted,
                    payouts: Vec::new(),
                }))
            }
            ListingStatus::Whitelisted => Ok(None),
            ListingStatus::Challenged => self.advance_ballot(store, listing, height, params),
        }
    }

    /// [`advance`](Self::advance) every listing, in key order.
    pub fn advance_all(
        &self,
        store: &mut dyn KvStore,
        height: u64,
        params: &RegistryParams,
    ) -> RegistryResult<Vec<Settlement>> {
        let identifiers: Vec<String> = self
            .listings(&*store)?
            .into_iter()
            .map(|listing| listing.identifier)
            .collect();

        let mut settlements = Vec::new();
        for identifier in identifiers {
            if let Some(settlement) = self.advance(store, &identifier, height, params)? {
                settlements.push(settlement);
            }
        }
        Ok(settlements)
    }

    fn advance_ballot(
        &self,
        store: &mut dyn KvStore,
        mut listing: Listing,
        height: u64,
        params: &RegistryParams,
    ) -> RegistryResult<Option<Settlement>> {
        let identifier = listing.identifier.clone();
        let mut ballot = match self.get_ballot(&*store, &identifier)? {
            Some(ballot) if ballot.phase.is_open() => ballot,
            _ => {
                return Err(RegistryError::Corrupt {
                    namespace: Namespace::Ballots,
                    reason: format!("challenged listing {identifier} has no live ballot"),
                })
            }
        };

        let mut transition = None;
        if ballot.phase == BallotPhase::Commit && height >= params.reveal_height(ballot.challenged_at)
        {
            ballot.phase = BallotPhase::Reveal;
            transition = Some(Transition::RevealOpened);
            debug!(identifier = %identifier, height, "reveal phase opened");
        }

        if ballot.phase != BallotPhase::Reveal || height < params.resolve_height(ballot.challenged_at)
        {
            if transition.is_some() {
                self.put_ballot(store, &ballot)?;
            }
            return Ok(transition.map(|transition| Settlement {
                identifier,
                height,
                transition,
                payouts: Vec::new(),
            }));
        }

        let votes = self.revealed_votes(&*store, &identifier, ballot.challenged_at)?;
        let (verdict, payouts) = tally(&ballot, listing.bond, &votes, params);
        ballot.phase = BallotPhase::Resolved(verdict);
        self.put_ballot(store, &ballot)?;

        match verdict {
            Verdict::Kept => {
                listing.status = ListingStatus::Whitelisted;
                listing.display = true;
                self.put_listing(store, &listing)?;
            }
            Verdict::Removed => self.remove_listing(store, &identifier)?,
        }

        let settlement = Settlement {
            identifier,
            height,
            transition: Transition::Resolved(verdict),
            payouts,
        };
        info!(
            identifier = %settlement.identifier,
            height,
            %verdict,
            approve = ballot.approve,
            deny = ballot.deny,
            voters = votes.len(),
            paid = settlement.total_paid(),
            "ballot resolved"
        );
        Ok(Some(settlement))
    }
}
