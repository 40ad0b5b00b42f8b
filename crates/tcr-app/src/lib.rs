//! Application shell for the token curated registry.
//!
//! [`RegistryApp`] is the main entry point for embedding the registry. It
//! owns the block store and drives the per-block lifecycle:
//!
//! 1. [`RegistryApp::begin_block`] sets the current height, which must
//!    exceed the previous one.
//! 2. [`RegistryApp::deliver_tx`] authenticates each transaction, dispatches
//!    its message to a handler, and commits the handler's writes only if it
//!    succeeds.
//! 3. [`RegistryApp::end_block`] advances every listing and ballot whose
//!    stage has elapsed and credits the resulting payouts.

pub mod app;
pub mod config;
pub mod error;
pub mod handler;

pub use app::{RegistryApp, TxReceipt};
pub use config::{AppConfig, ConfigError};
pub use error::{BlockError, TxError};

// Re-export key types
pub use tcr_ledger::{Payout, PayoutReason, RegistryParams, Settlement, Transition};
pub use tcr_types::{Address, Coin, Listing, RegistryMsg, StdTx, REGISTRY_DENOM};
