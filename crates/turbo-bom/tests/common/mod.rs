//! Shared catalog fixtures for integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use turbo_bom::prelude::*;

pub fn product_id() -> ProductId {
    ProductId::new("belt")
}

fn material(id: &str, unit: UnitOfMeasure, stock: Decimal) -> RawMaterial {
    RawMaterial::new(id, id.replace('_', " "), unit).with_stock(stock)
}

fn option_entry(option: &str, material: &str, quantity: Decimal) -> OptionBomEntry {
    OptionBomEntry {
        option_id: OptionId::new(option),
        material_id: MaterialId::new(material),
        quantity,
    }
}

/// Leather belt: Color {Black, Brown} x Size {Medium, Large}.
///
/// Black/Large resolves to {brass_buckle: 1, thread: 3.9, magnetic_clasp: 1,
/// black_leather: 0.5, black_dye: 1, wide_strap: 1}.
pub fn belt() -> CatalogSnapshot {
    let product = Product::new(
        product_id(),
        "Leather Belt",
        "BELT",
        Money::new(dec!(49.00), Currency::USD),
    )
    .with_base_weight(180);

    let mut snap = CatalogSnapshot::new(product);
    snap.attributes = vec![
        Attribute::new("color", product_id(), "Color", 0)
            .with_option(AttributeOption::new("black", "Black", 0))
            .with_option(AttributeOption::new("brown", "Brown", 1).with_price_modifier(dec!(2.50))),
        Attribute::new("size", product_id(), "Size", 1)
            .with_option(AttributeOption::new("medium", "Medium", 0))
            .with_option(
                AttributeOption::new("large", "Large", 1)
                    .with_price_modifier(dec!(5.00))
                    .with_weight_modifier(20),
            ),
    ];

    snap.materials = vec![
        material("brass_buckle", UnitOfMeasure::Piece, dec!(50)),
        material("thread", UnitOfMeasure::Meter, dec!(100)),
        material("magnetic_clasp", UnitOfMeasure::Piece, dec!(30)),
        material("black_leather", UnitOfMeasure::SquareMeter, dec!(10)),
        material("brown_leather", UnitOfMeasure::SquareMeter, dec!(4)),
        material("black_dye", UnitOfMeasure::Piece, dec!(15)),
        material("narrow_strap", UnitOfMeasure::Piece, dec!(12)),
        material("wide_strap", UnitOfMeasure::Piece, dec!(8)),
    ];

    snap.product_bom = ["brass_buckle", "thread", "magnetic_clasp"]
        .iter()
        .zip([dec!(1), dec!(3), dec!(1)])
        .map(|(material, quantity)| ProductBomEntry {
            product_id: product_id(),
            material_id: MaterialId::new(*material),
            quantity,
            unit: UnitOfMeasure::Piece,
        })
        .collect();

    snap.option_bom = vec![
        option_entry("black", "black_leather", dec!(0.5)),
        option_entry("black", "black_dye", dec!(1)),
        option_entry("brown", "brown_leather", dec!(0.5)),
        option_entry("medium", "narrow_strap", dec!(1)),
        option_entry("large", "wide_strap", dec!(1)),
    ];

    snap.option_modifiers = vec![OptionBomModifier {
        option_id: OptionId::new("large"),
        material_id: MaterialId::new("thread"),
        op: ModifierOp::Multiply(dec!(1.3)),
    }];

    snap
}

/// Find the variant selecting exactly `options`.
pub fn variant_with<'a>(variants: &'a [Variant], options: &[&str]) -> &'a Variant {
    variants
        .iter()
        .find(|v| {
            v.options.len() == options.len()
                && options
                    .iter()
                    .all(|o| v.options.iter().any(|s| s.option_id.as_str() == *o))
        })
        .unwrap_or_else(|| panic!("no variant with options {:?}", options))
}

pub fn materials(entries: &[(&str, Decimal)]) -> MaterialMap {
    entries
        .iter()
        .map(|(id, q)| (MaterialId::new(*id), *q))
        .collect()
}
