use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::Result;

use crate::domains::carving::CarvingConfig;
use crate::domains::formation::FormationConfig;
use crate::domains::path_planning::AStarConfig;
use crate::domains::safe_zone::SafeZoneConfig;

/// Prefix for environment overrides, e.g. `AUV_PLANNER__GRID__RESOLUTION=0.5`.
pub const ENV_PREFIX: &str = "AUV_PLANNER";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: AStarConfig,
    pub safe_zone: SafeZoneConfig,
    pub carving: CarvingConfig,
    pub formation: FormationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Rolling log file for the domain logger; console only when unset.
    pub file_path: Option<String>,
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_path: None,
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Read a TOML file. Missing sections fall back to their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Layered load: defaults, then the optional file, then environment
    /// overrides under [`ENV_PREFIX`].
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Config::default())?);

        if let Some(p) = path {
            builder = builder.add_source(
                ::config::File::from(p.as_ref().to_path_buf()).required(false),
            );
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
