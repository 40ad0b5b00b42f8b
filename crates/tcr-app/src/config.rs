use std::path::Path;

use serde::{Deserialize, Serialize};
use tcr_ledger::{ParamsError, RegistryParams};

/// Application configuration, loaded from TOML.
///
/// ```toml
/// [params]
/// min_deposit = 100
/// apply_stage = 10
/// commit_stage = 10
/// reveal_stage = 10
/// dispensation_pct = 50
/// quorum_pct = 50
/// ```
///
/// Missing keys take their default values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub params: RegistryParams,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),
}

impl AppConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        Ok(())
    }
}
