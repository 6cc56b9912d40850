//! Engine configuration.

use crate::error::Result;
use crate::money::Currency;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Currency material-cost roll-ups are reported in. Variant prices keep
    /// the product's own currency.
    #[serde(default)]
    pub currency: Currency,

    /// SKU generation settings.
    #[serde(default)]
    pub sku: SkuConfig,

    /// Regeneration locking settings.
    #[serde(default)]
    pub regeneration: RegenerationConfig,
}

impl EngineConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// How SKUs for new variants are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuConfig {
    /// Characters kept from an option value when it has no explicit code.
    #[serde(default = "default_abbreviation_length")]
    pub abbreviation_length: usize,

    /// Joins the prefix, option segments and disambiguation suffix.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Highest suffix tried before giving up with `SkuExhausted`.
    #[serde(default = "default_max_suffix")]
    pub max_suffix: u32,
}

impl Default for SkuConfig {
    fn default() -> Self {
        Self {
            abbreviation_length: default_abbreviation_length(),
            separator: default_separator(),
            max_suffix: default_max_suffix(),
        }
    }
}

/// Per-product regeneration lock settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerationConfig {
    /// How long to wait for another regeneration of the same product.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

impl RegenerationConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

impl Default for RegenerationConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

fn default_abbreviation_length() -> usize {
    3
}

fn default_separator() -> String {
    "-".to_string()
}

fn default_max_suffix() -> u32 {
    999
}

fn default_lock_timeout_ms() -> u64 {
    5000
}
