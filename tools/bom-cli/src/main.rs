//! TurboBOM CLI - Command line tool for variant and BOM resolution.
//!
//! Commands:
//! - `turbo-bom variants` - Generate and reconcile a product's variants
//! - `turbo-bom price` - Show effective prices and weights
//! - `turbo-bom bom` - Show a variant's resolved bill of materials
//! - `turbo-bom producibility` - Show producible units from current stock
//! - `turbo-bom consume` - Run a production batch
//! - `turbo-bom config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use commands::{BomArgs, ConfigArgs, ConsumeArgs, PriceArgs, ProducibilityArgs, VariantsArgs};

/// TurboBOM CLI - Resolve variants, prices and bills of materials
#[derive(Parser)]
#[command(name = "turbo-bom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and reconcile variants
    Variants(VariantsArgs),

    /// Show effective prices and weights
    Price(PriceArgs),

    /// Show a variant's resolved bill of materials
    Bom(BomArgs),

    /// Show producible units from current stock
    Producibility(ProducibilityArgs),

    /// Run a production batch
    Consume(ConsumeArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Variants(args) => commands::variants::run(args, &ctx).await,
        Commands::Price(args) => commands::price::run(args, &ctx).await,
        Commands::Bom(args) => commands::bom::run(args, &ctx).await,
        Commands::Producibility(args) => commands::producibility::run(args, &ctx).await,
        Commands::Consume(args) => commands::consume::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
