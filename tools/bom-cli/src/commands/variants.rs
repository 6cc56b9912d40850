//! Generate and reconcile variants.

use anyhow::{bail, Result};
use turbo_bom::variants::{GenerationOutcome, VariantChange, VariantGenerator};

use super::VariantsArgs;
use crate::context::{write_json, Context};
use crate::output::status_badge;

/// Run the variants command.
pub async fn run(args: VariantsArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog(&args.catalog)?;
    let existing = if catalog.stored {
        catalog.variants
    } else {
        Vec::new()
    };

    let outcome =
        VariantGenerator::new(&ctx.config.engine.sku).generate(&catalog.snapshot, &existing)?;

    if args.write {
        let Some(path) = ctx.variants_path(&args.catalog) else {
            bail!("No variants file given. Pass --variants or set catalog.variants.");
        };
        let stored: Vec<_> = outcome.all_variants().cloned().collect();
        write_json(&path, &stored)?;
        ctx.output.debug(&format!("Wrote {} variants to {}", stored.len(), path.display()));
    }

    if ctx.output.is_json() {
        ctx.output.json(&outcome);
        return Ok(());
    }

    print_outcome(&outcome, args.all, ctx);

    if args.write {
        ctx.output.success(&format!(
            "Saved {} change(s) for {}",
            outcome.write_count(),
            outcome.product_id
        ));
    } else if !outcome.is_noop() {
        ctx.output
            .info("Dry run: pass --write to save these changes to the variants file");
    }

    Ok(())
}

fn print_outcome(outcome: &GenerationOutcome, all: bool, ctx: &Context) {
    ctx.output.header(&format!("Variants of {}", outcome.product_id));

    let created: Vec<_> = outcome.created().iter().map(|v| v.id.clone()).collect();
    let reactivated: Vec<_> = outcome.reactivated().into_iter().cloned().collect();

    let widths = [20, 28, 12];
    ctx.output.table_row(&["SKU", "NAME", "STATUS"], &widths);
    for variant in &outcome.target {
        let status = if created.contains(&variant.id) {
            "created"
        } else if reactivated.contains(&variant.id) {
            "reactivated"
        } else {
            "kept"
        };
        ctx.output
            .table_row(&[&variant.sku, &variant.name, &status_badge(status)], &widths);
    }

    let retired: Vec<_> = outcome
        .changes
        .iter()
        .filter_map(|change| match change {
            VariantChange::Deactivated(id) => Some(id),
            _ => None,
        })
        .collect();
    for variant in &outcome.deactivated {
        let status = if retired.contains(&&variant.id) {
            "deactivated"
        } else if all {
            "inactive"
        } else {
            continue;
        };
        ctx.output
            .table_row(&[&variant.sku, &variant.name, &status_badge(status)], &widths);
    }

    for failure in &outcome.failures {
        ctx.output.warn(&format!("Skipped a combination: {}", failure.error));
    }

    ctx.output.kv("target", &outcome.target.len().to_string());
    ctx.output.kv("writes", &outcome.write_count().to_string());
}
