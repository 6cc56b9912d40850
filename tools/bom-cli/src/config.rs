//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_bom::EngineConfig;

/// Config file names searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["turbo-bom.toml", ".turbo-bom.toml", "turbo-bom.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Engine settings (`currency`, `[sku]`, `[regeneration]`).
    #[serde(flatten)]
    pub engine: EngineConfig,

    /// Default catalog files.
    #[serde(default)]
    pub catalog: CatalogFiles,
}

/// Where commands read and write catalog data when no path is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFiles {
    /// Catalog snapshot JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,

    /// Stored variants JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<String>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Generate a default turbo-bom.toml config file.
pub fn generate_default_config() -> String {
    r#"# Variant and BOM engine configuration

currency = "USD"

[sku]
abbreviation_length = 3
separator = "-"
max_suffix = 999

[regeneration]
lock_timeout_ms = 5000

[catalog]
snapshot = "catalog.json"
variants = "variants.json"
"#
    .to_string()
}
