use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::Region;

pub const DEFAULT_REGION_ENV: &str = "ESG_DEFAULT_REGION";
pub const FLIGHT_MODE_ENV: &str = "ESG_FLIGHT_MODE";

/// How business-travel flight distances are charged in Scope 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightMode {
    /// Every flight km at the long-haul factor, matching historical reports.
    #[default]
    Legacy,
    /// `flight_km_short` at the short-haul factor, everything else long-haul.
    Split,
}

impl FromStr for FlightMode {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(FlightMode::Legacy),
            "split" => Ok(FlightMode::Split),
            other => Err(EngineError::InvalidConfig(format!(
                "flight mode must be `legacy` or `split`, got `{other}`"
            ))),
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightMode::Legacy => f.write_str("legacy"),
            FlightMode::Split => f.write_str("split"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub default_region: Region,
    pub flight_mode: FlightMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_region: Region::Europe,
            flight_mode: FlightMode::Legacy,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(DEFAULT_REGION_ENV).filter(|v| !v.trim().is_empty()) {
            config.default_region = value.parse().map_err(|_| {
                EngineError::InvalidConfig(format!("{DEFAULT_REGION_ENV}=`{value}` is not a region"))
            })?;
        }

        if let Some(value) = lookup(FLIGHT_MODE_ENV).filter(|v| !v.trim().is_empty()) {
            config.flight_mode = value.parse()?;
        }

        Ok(config)
    }
}
