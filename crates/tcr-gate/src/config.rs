use serde::{Deserialize, Serialize};
use tcr_types::REGISTRY_DENOM;

/// Configuration for the authentication gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Minimum balance a signer must hold in `bond_denom`.
    pub min_bond: u64,
    /// Denomination the minimum bond is measured in.
    pub bond_denom: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_bond: 100,
            bond_denom: REGISTRY_DENOM.to_string(),
        }
    }
}

impl GateConfig {
    pub fn with_min_bond(min_bond: u64) -> Self {
        Self {
            min_bond,
            ..Default::default()
        }
    }
}
