//! Foundation types for the token curated registry (TCR).
//!
//! This crate provides the identity, value, record, and message types shared
//! by every other TCR crate. It has no knowledge of storage or signing; it
//! only defines shapes and their canonical encodings.
//!
//! # Key Types
//!
//! - [`Address`] -- Account identity derived from an Ed25519 public key
//! - [`Coin`] -- An amount of a single token denomination
//! - [`Listing`] / [`ListingStatus`] -- A registry entry and its lifecycle state
//! - [`Ballot`] / [`BallotPhase`] -- The tally for one challenge on one listing
//! - [`Voter`] / [`Vote`] -- Commit-reveal voting identities and revealed votes
//! - [`CommitmentHash`] -- Opaque 256-bit vote commitment
//! - [`RegistryMsg`] -- Closed set of transaction messages
//! - [`StdTx`] -- Signed transaction envelope

pub mod address;
pub mod coin;
pub mod digest;
pub mod error;
pub mod msg;
pub mod registry;
pub mod tx;

pub use address::Address;
pub use coin::{Coin, REGISTRY_DENOM};
pub use digest::CommitmentHash;
pub use error::TypeError;
pub use msg::{ChallengeMsg, CommitMsg, ProposeMsg, RegistryMsg, RevealMsg};
pub use registry::{Ballot, BallotPhase, Listing, ListingStatus, Verdict, Vote, Voter};
pub use tx::{StdSignature, StdTx};
