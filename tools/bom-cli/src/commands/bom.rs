//! Resolved bill of materials for one variant.

use anyhow::Result;
use turbo_bom::bom::{BomAnomaly, BomResolver};
use turbo_bom::stock::ConsumptionPlan;

use super::{find_variant, BomArgs};
use crate::context::Context;

/// Run the bom command.
pub async fn run(args: BomArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog(&args.catalog)?;
    let snapshot = &catalog.snapshot;
    let variant = find_variant(&catalog.variants, &args.sku)?;

    let bom = BomResolver::new(snapshot).resolve(variant)?;
    let plan = ConsumptionPlan::for_units(&bom, args.units)?;
    let currency = ctx.config.engine.currency;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "sku": variant.sku,
            "bom": bom,
            "lines": bom.lines(snapshot),
            "plan": plan,
            "material_cost": bom.material_cost(snapshot, currency).rounded(),
        }));
        return Ok(());
    }

    ctx.output.header(&format!("BOM of {} ({})", variant.sku, variant.name));
    let widths = [20, 24, 12, 8, 12];
    ctx.output
        .table_row(&["MATERIAL", "NAME", "QUANTITY", "UNIT", "COST"], &widths);
    for line in bom.lines(snapshot) {
        ctx.output.table_row(
            &[
                line.material_id.as_str(),
                &line.name,
                &line.quantity.normalize().to_string(),
                line.unit.as_str(),
                &line.cost.round_dp(currency.decimal_places()).to_string(),
            ],
            &widths,
        );
    }

    ctx.output
        .kv("material cost", &bom.material_cost(snapshot, currency).display());

    if args.units > 1 {
        ctx.output.info(&format!("For {} units:", args.units));
        for (material, quantity) in &plan.materials {
            ctx.output
                .list_item(&format!("{}: {}", material, quantity.normalize()));
        }
    }

    for anomaly in &bom.anomalies {
        let BomAnomaly::NegativeQuantityClamped {
            material_id,
            computed,
        } = anomaly;
        ctx.output.warn(&format!(
            "{} resolved to {}, clamped to 0",
            material_id, computed
        ));
    }

    Ok(())
}
