//! Built-in gate stages.

pub mod bond;
pub mod envelope;
pub mod signature;

pub use bond::MinimumBondStage;
pub use envelope::{EnvelopeStage, SignatureCountStage};
pub use signature::{SignatureStage, SignerStage};
