use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::filter::DatePartsConfig;
use crate::logging::LoggingConfig;
use crate::runtime::RuntimeConfig;
use crate::validate;

// ---------------------------------------------------------------------------
// Raw TOML structure (intermediate representation)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PipelineConfigRaw {
    #[serde(default)]
    filter: DatePartsConfig,
    #[serde(default)]
    runtime: RuntimeConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// PipelineConfig (resolved, validated)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub filter: DatePartsConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    /// Read and parse a `dateparts.toml` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.as_ref().display()))?;
        content.parse()
    }
}

impl FromStr for PipelineConfig {
    type Err = anyhow::Error;

    /// Parse a TOML string into a validated [`PipelineConfig`].
    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let raw: PipelineConfigRaw = toml::from_str(toml_str)?;

        let config = PipelineConfig {
            filter: raw.filter,
            runtime: raw.runtime,
            logging: raw.logging,
        };

        validate::validate(&config)?;

        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
