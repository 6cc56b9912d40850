//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use turbo_bom::catalog::{CatalogSnapshot, Variant};
use turbo_bom::variants::VariantGenerator;

use crate::commands::CatalogArgs;
use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration was loaded from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

/// A snapshot plus the variants commands operate on.
pub struct Catalog {
    pub snapshot: CatalogSnapshot,
    pub variants: Vec<Variant>,
    /// False when no variants file existed and the list was generated.
    pub stored: bool,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = PathBuf::from(path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(ref path) = config_path {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Snapshot path from the command line, else from `[catalog]`.
    pub fn snapshot_path(&self, args: &CatalogArgs) -> Result<PathBuf> {
        match args.snapshot.as_deref().or(self.config.catalog.snapshot.as_deref()) {
            Some(path) => Ok(self.resolve_path(path)),
            None => bail!("No catalog snapshot given. Pass --snapshot or set catalog.snapshot."),
        }
    }

    /// Variants path from the command line, else from `[catalog]`.
    pub fn variants_path(&self, args: &CatalogArgs) -> Option<PathBuf> {
        args.variants
            .as_deref()
            .or(self.config.catalog.variants.as_deref())
            .map(|path| self.resolve_path(path))
    }

    /// Load the snapshot and its variants.
    ///
    /// Without a stored variants file, the generated target set stands in.
    pub fn load_catalog(&self, args: &CatalogArgs) -> Result<Catalog> {
        let snapshot_path = self.snapshot_path(args)?;
        let snapshot = read_json::<CatalogSnapshot>(&snapshot_path)?;

        if let Some(path) = self.variants_path(args).filter(|p| p.exists()) {
            let variants = read_json::<Vec<Variant>>(&path)?;
            self.output
                .debug(&format!("Loaded {} variants from {}", variants.len(), path.display()));
            return Ok(Catalog {
                snapshot,
                variants,
                stored: true,
            });
        }

        let outcome = VariantGenerator::new(&self.config.engine.sku).generate(&snapshot, &[])?;
        self.output.debug("No stored variants, using the generated set");
        if let Some(warning) = unmatched_overrides_warning(&snapshot) {
            self.output.warn(&warning);
        }
        Ok(Catalog {
            snapshot,
            variants: outcome.target,
            stored: false,
        })
    }
}

/// Generated variants get fresh IDs, so overrides keyed by stored variant
/// IDs cannot match them.
fn unmatched_overrides_warning(snapshot: &CatalogSnapshot) -> Option<String> {
    if snapshot.variant_overrides.is_empty() {
        return None;
    }
    Some(format!(
        "Snapshot has {} variant BOM override(s) but no stored variants; \
         they will not apply. Pass --variants to use them.",
        snapshot.variant_overrides.len()
    ))
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Read and parse a JSON file.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write a value as pretty JSON.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_bom::catalog::{OverrideOp, VariantBomOverride};
    use turbo_bom::{MaterialId, VariantId};

    #[test]
    fn test_find_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("turbo-bom.toml"), "currency = \"USD\"\n").unwrap();

        let found = find_config(&nested).unwrap();
        assert_eq!(found, dir.path().join("turbo-bom.toml"));
    }

    #[test]
    fn test_nearest_config_wins() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shop");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("turbo-bom.toml"), "").unwrap();
        std::fs::write(nested.join(".turbo-bom.toml"), "").unwrap();

        assert_eq!(find_config(&nested).unwrap(), nested.join(".turbo-bom.toml"));
    }

    fn belt() -> CatalogSnapshot {
        let demo = include_str!("../../../demos/belt/catalog.json");
        serde_json::from_str(demo).unwrap()
    }

    #[test]
    fn test_generated_variants_warn_about_overrides() {
        let mut snapshot = belt();
        snapshot.variant_overrides.clear();
        assert!(unmatched_overrides_warning(&snapshot).is_none());

        snapshot.variant_overrides.push(VariantBomOverride {
            variant_id: VariantId::new("stored-id"),
            op: OverrideOp::Remove {
                material: MaterialId::new("thread"),
            },
        });
        let warning = unmatched_overrides_warning(&snapshot).unwrap();
        assert!(warning.contains("1 variant BOM override(s)"));
        assert!(warning.contains("--variants"));
    }

    #[test]
    fn test_load_catalog_without_variants_file_generates() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot_path = dir.path().join("catalog.json");
        write_json(&snapshot_path, &belt()).unwrap();

        let ctx = Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: dir.path().to_path_buf(),
        };
        let args = CatalogArgs {
            snapshot: Some("catalog.json".to_string()),
            variants: Some("variants.json".to_string()),
        };
        let catalog = ctx.load_catalog(&args).unwrap();
        assert!(!catalog.stored);
        assert!(!catalog.variants.is_empty());
    }
}
