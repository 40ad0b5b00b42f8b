//! Account balances and bond escrow for the token curated registry.
//!
//! Every bond moved by the registry goes through a [`BondEscrow`]: proposals,
//! challenges and reveals debit the signer, and resolution credits winners.
//! Balances live in the isolated `accounts` namespace of the same
//! [`KvStore`](tcr_store::KvStore) the registry writes to, so a debit made
//! inside a transaction is discarded together with the transaction's other
//! writes when it fails.
//!
//! # Modules
//!
//! - [`error`] -- Error types for balance operations
//! - [`types`] -- [`Account`], [`Coins`], [`BalanceChange`]
//! - [`traits`] -- The [`BondEscrow`] trait
//! - [`keeper`] -- [`CoinKeeper`], the store-backed escrow

pub mod error;
pub mod keeper;
pub mod traits;
pub mod types;

pub use error::{BankError, BankResult};
pub use keeper::CoinKeeper;
pub use traits::BondEscrow;
pub use types::{Account, BalanceChange, Coins};
