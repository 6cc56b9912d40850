//! CLI command implementations.

pub mod bom;
pub mod config;
pub mod consume;
pub mod price;
pub mod producibility;
pub mod variants;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use turbo_bom::catalog::Variant;

/// Catalog files shared by every catalog command.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Catalog snapshot JSON (default: catalog.snapshot from config).
    #[arg(short, long)]
    pub snapshot: Option<String>,

    /// Stored variants JSON (default: catalog.variants from config).
    #[arg(long)]
    pub variants: Option<String>,
}

/// Arguments for the variants command.
#[derive(Args)]
pub struct VariantsArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Write the reconciled variants back to the variants file.
    #[arg(short, long)]
    pub write: bool,

    /// Include deactivated variants in the listing.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the price command.
#[derive(Args)]
pub struct PriceArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Only this SKU (default: every active variant).
    pub sku: Option<String>,
}

/// Arguments for the bom command.
#[derive(Args)]
pub struct BomArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Variant SKU.
    pub sku: String,

    /// Units to plan for.
    #[arg(short, long, default_value = "1")]
    pub units: u64,
}

/// Arguments for the producibility command.
#[derive(Args)]
pub struct ProducibilityArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Only this SKU (default: every active variant).
    pub sku: Option<String>,
}

/// Arguments for the consume command.
#[derive(Args)]
pub struct ConsumeArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Variant SKU.
    pub sku: String,

    /// Units to produce.
    #[arg(short, long)]
    pub units: u64,

    /// Batch reference (default: generated).
    #[arg(short, long)]
    pub batch: Option<String>,

    /// Who is running the batch.
    #[arg(long)]
    pub actor: Option<String>,

    /// Write updated stock back to the snapshot and variants files.
    #[arg(short, long)]
    pub write: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// The variant with `sku`.
pub fn find_variant<'a>(variants: &'a [Variant], sku: &str) -> Result<&'a Variant> {
    variants
        .iter()
        .find(|v| v.sku == sku)
        .ok_or_else(|| anyhow!("No variant with SKU {}", sku))
}

/// One SKU, or every active variant.
pub fn select_variants<'a>(variants: &'a [Variant], sku: Option<&str>) -> Result<Vec<&'a Variant>> {
    match sku {
        Some(sku) => Ok(vec![find_variant(variants, sku)?]),
        None => Ok(variants.iter().filter(|v| v.is_active).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_bom::ProductId;

    #[test]
    fn test_select_variants() {
        let mut retired = Variant::new(ProductId::new("belt"), "BELT-OLD", Vec::new());
        retired.is_active = false;
        let variants = vec![
            Variant::new(ProductId::new("belt"), "BELT-BLA", Vec::new()),
            retired,
        ];

        assert_eq!(select_variants(&variants, None).unwrap().len(), 1);
        assert_eq!(
            select_variants(&variants, Some("BELT-OLD")).unwrap()[0].sku,
            "BELT-OLD"
        );
        assert!(select_variants(&variants, Some("BELT-RED")).is_err());
    }
}
