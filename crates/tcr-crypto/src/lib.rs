//! Cryptographic primitives for the token curated registry.
//!
//! Provides domain-separated BLAKE3 hashing for vote commitments and
//! Ed25519 signing/verification of transaction messages.
//!
//! All crypto operations wrap established libraries -- no custom cryptography.

pub mod hasher;
pub mod signer;

pub use hasher::{commit_vote, ContentHasher, HasherError};
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
