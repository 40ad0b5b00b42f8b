//! Registry state machine for the token curated registry (TCR).
//!
//! This crate is the heart of the TCR. It provides:
//! - [`RegistryLedger`], the typed accessor over a [`KvStore`](tcr_store::KvStore)
//!   exposing the per-listing operations (propose, challenge, commit, reveal)
//! - Commit-reveal voting with per-round commitment and reveal records
//! - Height-driven resolution: whitelisting, ballot phase changes, tallying,
//!   and the [`Settlement`] of bonds
//! - [`RegistryParams`], the staging and payout parameters
//!
//! Every operation takes the store explicitly. The ledger never moves
//! tokens; it reports [`Payout`]s for the caller to credit.

pub mod codec;
pub mod error;
pub mod params;
pub mod records;
pub mod registry;
pub mod resolution;

pub use error::{RegistryError, RegistryResult};
pub use params::{ParamsError, RegistryParams};
pub use records::{RevealedVote, StoredCommitment};
pub use registry::RegistryLedger;
pub use resolution::{tally, Payout, PayoutReason, Settlement, Transition};
