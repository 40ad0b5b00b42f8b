use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The only denomination accepted for registry bonds.
pub const REGISTRY_DENOM: &str = "RegistryCoin";

/// An amount of one token denomination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// A coin in [`REGISTRY_DENOM`].
    pub fn registry(amount: u64) -> Self {
        Self::new(REGISTRY_DENOM, amount)
    }

    /// Check that this coin is usable as a bond: positive and in
    /// [`REGISTRY_DENOM`].
    pub fn validate_bond(&self) -> Result<(), TypeError> {
        if self.amount == 0 || self.denom != REGISTRY_DENOM {
            return Err(TypeError::InvalidBond {
                expected: REGISTRY_DENOM,
                denom: self.denom.clone(),
                amount: self.amount,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
