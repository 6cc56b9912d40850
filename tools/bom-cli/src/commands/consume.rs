//! Run a production batch against the snapshot's stock.

use anyhow::{bail, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use turbo_bom::bom::BomResolver;
use turbo_bom::producibility::{snapshot_stock, ProducibilityCalculator};
use turbo_bom::stock::{ConsumptionPlan, InMemoryStockLedger, StockLedger, StockSubject};
use turbo_bom::BatchId;

use super::{find_variant, ConsumeArgs};
use crate::context::{write_json, Context};
use crate::output::format_limiting;

/// Run the consume command.
pub async fn run(args: ConsumeArgs, ctx: &Context) -> Result<()> {
    let mut catalog = ctx.load_catalog(&args.catalog)?;
    let variant = find_variant(&catalog.variants, &args.sku)?.clone();

    let bom = BomResolver::new(&catalog.snapshot).resolve(&variant)?;
    let plan = ConsumptionPlan::for_units(&bom, args.units)?;

    let producible = ProducibilityCalculator::for_bom(&bom, &snapshot_stock(&catalog.snapshot));
    if !producible.can_produce(args.units) {
        bail!(
            "Cannot produce {} x {}: stock covers {} (limited by {})",
            args.units,
            variant.sku,
            producible.units().unwrap_or(0),
            format_limiting(&producible)
        );
    }

    let batch = args
        .batch
        .map(BatchId::new)
        .unwrap_or_else(|| BatchId::new(format!("batch-{}", Utc::now().format("%Y%m%d%H%M%S"))));

    let ledger = InMemoryStockLedger::from_snapshot(&catalog.snapshot);
    let movements = ledger.produce(&plan, &batch, args.actor.as_deref()).await?;
    ctx.output.debug(&format!("Recorded {} movements", movements.len()));

    if args.write {
        let Some(variants_path) = ctx.variants_path(&args.catalog) else {
            bail!("No variants file given. Pass --variants or set catalog.variants.");
        };

        let levels = ledger.stock_levels().await?;
        for material in &mut catalog.snapshot.materials {
            if let Some(level) = levels.get(&material.id) {
                material.stock_quantity = *level;
            }
        }
        for stored in &mut catalog.variants {
            if stored.id == variant.id {
                stored.stock_quantity = stored.stock_quantity.saturating_add(args.units);
            }
        }

        write_json(&ctx.snapshot_path(&args.catalog)?, &catalog.snapshot)?;
        write_json(&variants_path, &catalog.variants)?;
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "batch": batch,
            "plan": plan,
            "movements": movements,
            "written": args.write,
        }));
        return Ok(());
    }

    ctx.output
        .header(&format!("Batch {}: {} x {}", batch, args.units, variant.sku));
    let widths = [20, 12, 12, 12];
    ctx.output
        .table_row(&["SUBJECT", "BEFORE", "DELTA", "AFTER"], &widths);
    for movement in &movements {
        let subject = match &movement.subject {
            StockSubject::Material(id) => id.to_string(),
            StockSubject::Variant(_) => variant.sku.clone(),
        };
        ctx.output.table_row(
            &[
                &subject,
                &movement.quantity_before.normalize().to_string(),
                &signed(movement.delta),
                &movement.quantity_after.normalize().to_string(),
            ],
            &widths,
        );
    }

    if args.write {
        ctx.output.success(&format!("Produced {} unit(s) of {}", args.units, variant.sku));
    } else {
        ctx.output.info("Dry run: pass --write to save the new stock levels");
    }

    Ok(())
}

fn signed(delta: Decimal) -> String {
    let delta = delta.normalize();
    if delta.is_sign_negative() {
        delta.to_string()
    } else {
        format!("+{}", delta)
    }
}
