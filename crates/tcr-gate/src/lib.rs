//! Authentication gate for the token curated registry.
//!
//! Every transaction must pass through the gate before its message is
//! dispatched to a handler. The gate runs a pipeline of stages (signature
//! count, envelope shape, signer identity, signature validity, minimum bond)
//! and produces an accept/reject decision with a per-stage audit trail. The
//! first rejecting stage ends evaluation, and no stage writes to the store.
//!
//! # Quick Start
//!
//! ```rust
//! use tcr_bank::{BondEscrow, CoinKeeper};
//! use tcr_crypto::SigningKey;
//! use tcr_gate::{AnteGate, GateConfig};
//! use tcr_store::InMemoryKvStore;
//! use tcr_types::{Coin, RegistryMsg};
//!
//! let key = SigningKey::generate();
//! let mut store = InMemoryKvStore::new();
//! CoinKeeper.add_coins(&mut store, &key.address(), &Coin::registry(100)).unwrap();
//!
//! let msg = RegistryMsg::propose(key.address(), "foo", Coin::registry(100));
//! let tx = key.sign_tx(msg).unwrap();
//!
//! let gate = AnteGate::with_default_stages(GateConfig::default());
//! let result = gate.evaluate(&tx, &store, &CoinKeeper).unwrap();
//! assert!(result.is_accepted());
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod stage;
pub mod stages;

// Re-exports for convenience.
pub use config::GateConfig;
pub use error::GateError;
pub use gate::{AnteGate, GateDecision, GateResult};
pub use stage::{codes, GateContext, GateStage, StageDecision, StageResult, AUTH_CODESPACE};
pub use stages::{
    EnvelopeStage, MinimumBondStage, SignatureCountStage, SignatureStage, SignerStage,
};
