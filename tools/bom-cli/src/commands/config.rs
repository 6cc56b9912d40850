//! Configuration management commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};
use turbo_bom::Currency;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let engine = &ctx.config.engine;
    ctx.output.kv("currency", engine.currency.code());

    ctx.output.info("");
    ctx.output.info("[sku]");
    ctx.output
        .kv("abbreviation_length", &engine.sku.abbreviation_length.to_string());
    ctx.output.kv("separator", &engine.sku.separator);
    ctx.output.kv("max_suffix", &engine.sku.max_suffix.to_string());

    ctx.output.info("");
    ctx.output.info("[regeneration]");
    ctx.output
        .kv("lock_timeout_ms", &engine.regeneration.lock_timeout_ms.to_string());

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "snapshot",
        ctx.config.catalog.snapshot.as_deref().unwrap_or("(unset)"),
    );
    ctx.output.kv(
        "variants",
        ctx.config.catalog.variants.as_deref().unwrap_or("(unset)"),
    );

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(ref config_path) = ctx.config_path else {
        bail!("No config file found. Run `turbo-bom config init` to create one.");
    };

    let mut config = CliConfig::load(config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path: PathBuf = ctx.cwd.join("turbo-bom.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Errors and warnings for a configuration.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let sku = &config.engine.sku;

    if sku.abbreviation_length == 0 {
        errors.push("sku.abbreviation_length must be at least 1".to_string());
    }
    if sku.max_suffix == 0 {
        warnings.push("sku.max_suffix is 0, colliding SKUs will never be disambiguated".to_string());
    }
    if sku.separator.chars().any(|c| c.is_ascii_alphanumeric()) {
        warnings.push(format!(
            "sku.separator '{}' contains alphanumerics and may be confused with SKU segments",
            sku.separator
        ));
    }
    if config.engine.regeneration.lock_timeout_ms == 0 {
        errors.push("regeneration.lock_timeout_ms must be positive".to_string());
    }
    if config.catalog.snapshot.is_none() {
        warnings.push("catalog.snapshot is unset, commands will need --snapshot".to_string());
    }

    (errors, warnings)
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();
    let engine = &config.engine;

    match parts.as_slice() {
        ["currency"] => Ok(format!("\"{}\"", engine.currency.code())),
        ["sku", "abbreviation_length"] => Ok(engine.sku.abbreviation_length.to_string()),
        ["sku", "separator"] => Ok(format!("\"{}\"", engine.sku.separator)),
        ["sku", "max_suffix"] => Ok(engine.sku.max_suffix.to_string()),
        ["regeneration", "lock_timeout_ms"] => Ok(engine.regeneration.lock_timeout_ms.to_string()),
        ["catalog", "snapshot"] => Ok(quoted_or_null(config.catalog.snapshot.as_deref())),
        ["catalog", "variants"] => Ok(quoted_or_null(config.catalog.variants.as_deref())),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let engine = &mut config.engine;

    match parts.as_slice() {
        ["currency"] => {
            engine.currency = match Currency::from_code(value) {
                Some(currency) => currency,
                None => bail!("Unknown currency: {}", value),
            }
        }
        ["sku", "abbreviation_length"] => engine.sku.abbreviation_length = value.parse()?,
        ["sku", "separator"] => engine.sku.separator = value.to_string(),
        ["sku", "max_suffix"] => engine.sku.max_suffix = value.parse()?,
        ["regeneration", "lock_timeout_ms"] => engine.regeneration.lock_timeout_ms = value.parse()?,
        ["catalog", "snapshot"] => config.catalog.snapshot = Some(value.to_string()),
        ["catalog", "variants"] => config.catalog.variants = Some(value.to_string()),
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

fn quoted_or_null(value: Option<&str>) -> String {
    value
        .map(|v| format!("\"{}\"", v))
        .unwrap_or_else(|| "null".to_string())
}
