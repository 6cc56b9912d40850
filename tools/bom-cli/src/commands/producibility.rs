//! Producible units from current raw-material stock.

use anyhow::Result;
use turbo_bom::bom::BomResolver;
use turbo_bom::producibility::{snapshot_stock, ProducibilityCalculator};

use super::{select_variants, ProducibilityArgs};
use crate::context::Context;
use crate::output::{format_limiting, format_units};

/// Run the producibility command.
pub async fn run(args: ProducibilityArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog(&args.catalog)?;
    let resolver = BomResolver::new(&catalog.snapshot);
    let stock = snapshot_stock(&catalog.snapshot);

    let mut rows = Vec::new();
    for variant in select_variants(&catalog.variants, args.sku.as_deref())? {
        let bom = resolver.resolve(variant)?;
        rows.push((variant, ProducibilityCalculator::for_bom(&bom, &stock)));
    }

    if ctx.output.is_json() {
        let json: Vec<_> = rows
            .iter()
            .map(|(variant, producibility)| {
                serde_json::json!({
                    "sku": variant.sku,
                    "variant_id": variant.id,
                    "producibility": producibility,
                })
            })
            .collect();
        ctx.output.json(&json);
        return Ok(());
    }

    ctx.output
        .header(&format!("Producibility of {}", catalog.snapshot.product.name));
    let widths = [20, 28, 10, 30];
    ctx.output
        .table_row(&["SKU", "NAME", "UNITS", "LIMITED BY"], &widths);
    for (variant, producibility) in &rows {
        ctx.output.table_row(
            &[
                &variant.sku,
                &variant.name,
                &format_units(producibility),
                &format_limiting(producibility),
            ],
            &widths,
        );
    }

    Ok(())
}
