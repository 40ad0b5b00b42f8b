use serde::{Deserialize, Serialize};

/// Staging and payout parameters of the registry.
///
/// Stage lengths are in blocks. Percentages are integers in `0..=100` so
/// that tallies are exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryParams {
    /// Minimum registry-coin balance a signer must hold to submit anything.
    pub min_deposit: u64,
    /// Blocks a pending listing waits before it is whitelisted.
    pub apply_stage: u64,
    /// Blocks a ballot accepts commitments.
    pub commit_stage: u64,
    /// Blocks a ballot accepts reveals, after the commit stage.
    pub reveal_stage: u64,
    /// Share of the forfeited bond paid to the winning party.
    pub dispensation_pct: u64,
    /// Approve share of revealed weight a listing must exceed to be kept.
    pub quorum_pct: u64,
}

impl Default for RegistryParams {
    fn default() -> Self {
        Self {
            min_deposit: 100,
            apply_stage: 10,
            commit_stage: 10,
            reveal_stage: 10,
            dispensation_pct: 50,
            quorum_pct: 50,
        }
    }
}

impl RegistryParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        // A zero-length voting window closes before any vote can land.
        for (field, value) in [
            ("commit_stage", self.commit_stage),
            ("reveal_stage", self.reveal_stage),
        ] {
            if value == 0 {
                return Err(ParamsError::EmptyStage { field });
            }
        }
        for (field, value) in [
            ("dispensation_pct", self.dispensation_pct),
            ("quorum_pct", self.quorum_pct),
        ] {
            if value > 100 {
                return Err(ParamsError::PercentOutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// First height at which a listing applied at `applied_at` is whitelisted.
    pub fn whitelist_height(&self, applied_at: u64) -> u64 {
        applied_at.saturating_add(self.apply_stage)
    }

    /// First height of the reveal phase for a ballot opened at `challenged_at`.
    pub fn reveal_height(&self, challenged_at: u64) -> u64 {
        challenged_at.saturating_add(self.commit_stage)
    }

    /// First height at which a ballot opened at `challenged_at` is tallied.
    pub fn resolve_height(&self, challenged_at: u64) -> u64 {
        self.reveal_height(challenged_at)
            .saturating_add(self.reveal_stage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    #[error("{field} must be a percentage in 0..=100, got {value}")]
    PercentOutOfRange { field: &'static str, value: u64 },

    #[error("{field} must be at least one block")]
    EmptyStage { field: &'static str },
}
