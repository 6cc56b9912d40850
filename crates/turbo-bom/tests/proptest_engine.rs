//! Property-based tests for variant generation and resolution.
//!
//! Uses proptest to generate random attribute shapes, BOMs and stock
//! levels, then verify the engine's structural guarantees hold.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use turbo_bom::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// Option counts per attribute.
fn arb_shape() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(1..=4usize, 1..=3)
}

/// Quantities with two decimal places.
fn arb_quantity(max_hundredths: i64) -> impl Strategy<Value = Decimal> {
    (0..=max_hundredths).prop_map(|n| Decimal::new(n, 2))
}

fn arb_bom_and_stock() -> impl Strategy<Value = (MaterialMap, MaterialMap)> {
    proptest::collection::vec((arb_quantity(1_000), arb_quantity(100_000)), 1..=6).prop_map(
        |rows| {
            let mut bom = MaterialMap::new();
            let mut stock = MaterialMap::new();
            for (i, (required, available)) in rows.into_iter().enumerate() {
                let id = MaterialId::new(format!("m{}", i));
                bom.insert(id.clone(), required);
                stock.insert(id, available);
            }
            (bom, stock)
        },
    )
}

fn snapshot_for(shape: &[usize]) -> CatalogSnapshot {
    let product_id = ProductId::new("p");
    let product = Product::new(
        product_id.clone(),
        "Prop",
        "P",
        Money::new(Decimal::new(1000, 2), Currency::USD),
    );
    let mut snap = CatalogSnapshot::new(product);

    for m in 0..4 {
        snap.materials.push(RawMaterial::new(
            format!("m{}", m),
            format!("Material {}", m),
            UnitOfMeasure::Piece,
        ));
    }
    snap.product_bom.push(ProductBomEntry {
        product_id: product_id.clone(),
        material_id: MaterialId::new("m0"),
        quantity: Decimal::ONE,
        unit: UnitOfMeasure::Piece,
    });

    for (i, count) in shape.iter().enumerate() {
        let mut attribute =
            Attribute::new(format!("a{}", i), product_id.clone(), format!("A{}", i), i as i32);
        for j in 0..*count {
            let option_id = format!("o{}_{}", i, j);
            attribute = attribute.with_option(
                AttributeOption::new(option_id.clone(), format!("V{}{}", i, j), j as i32)
                    .with_price_modifier(Decimal::new(j as i64 * 25, 2)),
            );
            snap.option_bom.push(OptionBomEntry {
                option_id: OptionId::new(option_id.clone()),
                material_id: MaterialId::new(format!("m{}", (i + j) % 4)),
                quantity: Decimal::from(j as i64 + 1),
            });
            snap.option_modifiers.push(OptionBomModifier {
                option_id: OptionId::new(option_id),
                material_id: MaterialId::new("m0"),
                op: ModifierOp::Add(Decimal::new(5, 1)),
            });
        }
        snap.attributes.push(attribute);
    }
    snap
}

fn generate(snapshot: &CatalogSnapshot, existing: &[Variant]) -> GenerationOutcome {
    let config = EngineConfig::default();
    VariantGenerator::new(&config.sku)
        .generate(snapshot, existing)
        .unwrap()
}

fn units_or_max(p: &Producibility) -> u64 {
    p.units().unwrap_or(u64::MAX)
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// One variant per combination, each with a distinct key and SKU.
    #[test]
    fn generation_is_complete(shape in arb_shape()) {
        let snapshot = snapshot_for(&shape);
        let outcome = generate(&snapshot, &[]);

        let expected: usize = shape.iter().product();
        prop_assert_eq!(outcome.target.len(), expected);
        prop_assert!(outcome.failures.is_empty());

        let keys: HashSet<OptionKey> = outcome.target.iter().map(|v| v.key()).collect();
        prop_assert_eq!(keys.len(), expected);
        let skus: HashSet<&str> = outcome.target.iter().map(|v| v.sku.as_str()).collect();
        prop_assert_eq!(skus.len(), expected);
        for variant in &outcome.target {
            prop_assert_eq!(variant.options.len(), shape.len());
        }
    }

    /// Regenerating against its own output writes nothing.
    #[test]
    fn generation_is_idempotent(shape in arb_shape()) {
        let snapshot = snapshot_for(&shape);
        let first = generate(&snapshot, &[]);
        let second = generate(&snapshot, &first.target);

        prop_assert!(second.is_noop());
        let before: Vec<&VariantId> = first.target.iter().map(|v| &v.id).collect();
        let after: Vec<&VariantId> = second.target.iter().map(|v| &v.id).collect();
        prop_assert_eq!(before, after);
    }

    /// The resolved BOM does not depend on how a variant lists its options.
    #[test]
    fn bom_ignores_option_order(shape in arb_shape()) {
        let snapshot = snapshot_for(&shape);
        let resolver = BomResolver::new(&snapshot);
        for variant in generate(&snapshot, &[]).target {
            let mut reversed = variant.clone();
            reversed.options.reverse();
            let a = resolver.resolve(&variant).unwrap();
            let b = resolver.resolve(&reversed).unwrap();
            prop_assert_eq!(a.quantities, b.quantities);
        }
    }

    /// An explicit price always wins; otherwise base plus modifiers.
    #[test]
    fn explicit_price_takes_precedence(shape in arb_shape(), cents in 0i64..100_000) {
        let snapshot = snapshot_for(&shape);
        let resolver = PricingResolver::new(&snapshot);
        for mut variant in generate(&snapshot, &[]).target {
            let computed: Decimal = variant
                .options
                .iter()
                .filter_map(|o| snapshot.option(&o.option_id))
                .map(|o| o.price_modifier)
                .sum::<Decimal>()
                + snapshot.product.base_price.amount;
            prop_assert_eq!(resolver.effective_price(&variant).unwrap().amount, computed);

            let explicit = Money::new(Decimal::new(cents, 2), Currency::USD);
            variant.price = Some(explicit);
            prop_assert_eq!(resolver.effective_price(&variant).unwrap(), explicit);
        }
    }

    /// N units fit in stock, N + 1 do not fit for the limiting materials.
    #[test]
    fn producibility_is_exact((bom, stock) in arb_bom_and_stock()) {
        let result = ProducibilityCalculator::compute(&bom, &stock);
        match &result {
            Producibility::Unlimited => {
                prop_assert!(bom.values().all(|q| q.is_zero()));
            }
            Producibility::Limited { units, limiting_materials } => {
                let n = Decimal::from(*units);
                for (material, required) in bom.iter().filter(|(_, q)| !q.is_zero()) {
                    prop_assert!(*required * n <= stock[material]);
                }
                for material in limiting_materials {
                    prop_assert!(bom[material] * (n + Decimal::ONE) > stock[material]);
                }
            }
        }
    }

    /// More stock never means fewer producible units.
    #[test]
    fn producibility_is_monotonic(
        (bom, stock) in arb_bom_and_stock(),
        pick in 0usize..6,
        extra in arb_quantity(50_000),
    ) {
        let before = ProducibilityCalculator::compute(&bom, &stock);

        let mut richer = stock.clone();
        let index = pick % richer.len();
        if let Some((_, quantity)) = richer.iter_mut().nth(index) {
            *quantity += extra;
        }
        let after = ProducibilityCalculator::compute(&bom, &richer);

        prop_assert!(units_or_max(&after) >= units_or_max(&before));
    }
}
