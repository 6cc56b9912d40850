//! Effective price and weight of variants.

use anyhow::Result;
use turbo_bom::pricing::PricingResolver;

use super::{select_variants, PriceArgs};
use crate::context::Context;

/// Run the price command.
pub async fn run(args: PriceArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog(&args.catalog)?;
    let resolver = PricingResolver::new(&catalog.snapshot);

    let rows: Vec<_> = select_variants(&catalog.variants, args.sku.as_deref())?
        .into_iter()
        .map(|variant| resolver.resolve(variant).map(|pricing| (variant, pricing)))
        .collect::<Result<_, _>>()?;

    if ctx.output.is_json() {
        let json: Vec<_> = rows
            .iter()
            .map(|(variant, pricing)| {
                serde_json::json!({
                    "sku": variant.sku,
                    "variant_id": variant.id,
                    "price": pricing.price.rounded(),
                    "weight_grams": pricing.weight_grams,
                    "price_overridden": pricing.price_overridden,
                    "weight_overridden": pricing.weight_overridden,
                })
            })
            .collect();
        ctx.output.json(&json);
        return Ok(());
    }

    ctx.output.header(&format!("Prices of {}", catalog.snapshot.product.name));
    let widths = [20, 28, 12, 10];
    ctx.output.table_row(&["SKU", "NAME", "PRICE", "WEIGHT"], &widths);
    for (variant, pricing) in &rows {
        let mut price = pricing.price.display();
        if pricing.price_overridden {
            price.push('*');
        }
        ctx.output.table_row(
            &[
                &variant.sku,
                &variant.name,
                &price,
                &format!("{} g", pricing.weight_grams),
            ],
            &widths,
        );
    }
    if rows.iter().any(|(_, pricing)| pricing.price_overridden) {
        ctx.output.info("* explicit variant price");
    }

    Ok(())
}
