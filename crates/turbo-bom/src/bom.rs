//! Bill-of-materials resolution.
//!
//! A variant's per-unit material requirements are built in four layers,
//! strictly in this order:
//!
//! 1. product base entries
//! 2. option additions, then option modifiers, each walked in attribute
//!    position order
//! 3. variant overrides, in list order
//!
//! Negative results are clamped to zero and reported as anomalies.

use crate::catalog::{CatalogSnapshot, ModifierOp, OverrideOp, Variant};
use crate::error::{CommerceError, Result};
use crate::ids::{MaterialId, VariantId};
use crate::money::{Currency, Money};
use crate::quantity::{accumulate, MaterialMap, Quantity, UnitOfMeasure};
use rust_decimal::Decimal;
use serde::Serialize;

/// Something in a resolved BOM an administrator should review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BomAnomaly {
    /// Modifiers or overrides drove a quantity below zero.
    NegativeQuantityClamped {
        material_id: MaterialId,
        computed: Quantity,
    },
}

/// Per-unit material requirements of one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBom {
    pub variant_id: VariantId,
    pub quantities: MaterialMap,
    pub anomalies: Vec<BomAnomaly>,
}

/// One row of a resolved BOM joined with material details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomLine {
    pub material_id: MaterialId,
    pub name: String,
    pub unit: UnitOfMeasure,
    pub quantity: Quantity,
    pub cost: Decimal,
}

impl ResolvedBom {
    /// Required quantity of a material, zero if absent.
    pub fn quantity(&self, material_id: &MaterialId) -> Quantity {
        self.quantities
            .get(material_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Materials with a nonzero requirement.
    pub fn constrained(&self) -> impl Iterator<Item = (&MaterialId, &Quantity)> {
        self.quantities.iter().filter(|(_, q)| **q > Decimal::ZERO)
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }

    /// Rows for display, in material-id order.
    pub fn lines(&self, snapshot: &CatalogSnapshot) -> Vec<BomLine> {
        self.quantities
            .iter()
            .map(|(id, quantity)| {
                let material = snapshot.material(id);
                BomLine {
                    material_id: id.clone(),
                    name: material.map(|m| m.name.clone()).unwrap_or_else(|| id.to_string()),
                    unit: material.map(|m| m.unit).unwrap_or_default(),
                    quantity: *quantity,
                    cost: material
                        .map(|m| m.cost_per_unit.saturating_mul(*quantity))
                        .unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Raw-material cost of producing one unit.
    pub fn material_cost(&self, snapshot: &CatalogSnapshot, currency: Currency) -> Money {
        let total = self
            .lines(snapshot)
            .iter()
            .fold(Decimal::ZERO, |total, line| total.saturating_add(line.cost));
        Money::new(total, currency)
    }
}

/// Resolves variant BOMs against one catalog snapshot.
///
/// Pure: the same snapshot and variant always give the same map.
#[derive(Debug, Clone, Copy)]
pub struct BomResolver<'a> {
    snapshot: &'a CatalogSnapshot,
}

impl<'a> BomResolver<'a> {
    pub fn new(snapshot: &'a CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    /// Resolve the per-unit BOM of `variant`.
    ///
    /// Fails with `MissingMaterialReference` if any rule that applies to the
    /// variant names an unknown material, and with `InvalidQuantity` if a
    /// quantity overflows. No partial map is returned.
    pub fn resolve(&self, variant: &Variant) -> Result<ResolvedBom> {
        let snapshot = self.snapshot;
        let mut map = MaterialMap::new();

        // Layer 1
        for entry in snapshot
            .product_bom
            .iter()
            .filter(|e| e.product_id == snapshot.product.id)
        {
            let context = || "product BOM entry".to_string();
            self.require(&entry.material_id, context)?;
            accumulate(&mut map, &entry.material_id, entry.quantity)
                .ok_or_else(|| overflow(&entry.material_id, context))?;
        }

        let selected: Vec<_> = snapshot
            .ordered_attributes()
            .into_iter()
            .filter_map(|attribute| variant.selected_option(&attribute.id))
            .collect();

        // Layer 2a
        for option_id in &selected {
            for entry in snapshot.option_entries(option_id) {
                let context = || format!("BOM entry of option {}", option_id);
                self.require(&entry.material_id, context)?;
                accumulate(&mut map, &entry.material_id, entry.quantity)
                    .ok_or_else(|| overflow(&entry.material_id, context))?;
            }
        }

        // Layer 2b
        for option_id in &selected {
            for modifier in snapshot.option_modifiers_for(option_id) {
                let context =
                    || format!("{} modifier of option {}", modifier.op.as_str(), option_id);
                self.require(&modifier.material_id, context)?;
                apply_modifier(&mut map, &modifier.material_id, modifier.op, context)?;
            }
        }

        // Layer 3
        for ov in snapshot.overrides_for(&variant.id) {
            let context = || format!("{} override of variant {}", ov.op.as_str(), variant.id);
            for material in ov.op.materials() {
                self.require(material, context)?;
            }
            apply_override(&mut map, &ov.op, &variant.id, context)?;
        }

        let anomalies = clamp_negatives(&mut map);
        for anomaly in &anomalies {
            let BomAnomaly::NegativeQuantityClamped {
                material_id,
                computed,
            } = anomaly;
            tracing::warn!(
                variant = %variant.id,
                material = %material_id,
                computed = %computed,
                "negative BOM quantity clamped to zero"
            );
        }

        Ok(ResolvedBom {
            variant_id: variant.id.clone(),
            quantities: map,
            anomalies,
        })
    }

    fn require(&self, material: &MaterialId, context: impl FnOnce() -> String) -> Result<()> {
        if self.snapshot.has_material(material) {
            Ok(())
        } else {
            Err(CommerceError::MissingMaterialReference {
                material: material.to_string(),
                context: context(),
            })
        }
    }
}

fn overflow(material: &MaterialId, context: impl FnOnce() -> String) -> CommerceError {
    CommerceError::InvalidQuantity(format!("{} overflows in {}", material, context()))
}

/// `multiply` and `add` only touch materials already present; `set` inserts.
fn apply_modifier(
    map: &mut MaterialMap,
    material: &MaterialId,
    op: ModifierOp,
    context: impl FnOnce() -> String,
) -> Result<()> {
    match op {
        ModifierOp::Multiply(factor) => {
            if let Some(quantity) = map.get_mut(material) {
                *quantity = quantity
                    .checked_mul(factor)
                    .ok_or_else(|| overflow(material, context))?;
            }
        }
        ModifierOp::Add(delta) => {
            if let Some(quantity) = map.get_mut(material) {
                *quantity = quantity
                    .checked_add(delta)
                    .ok_or_else(|| overflow(material, context))?;
            }
        }
        ModifierOp::Set(value) => {
            map.insert(material.clone(), value);
        }
    }
    Ok(())
}

/// A `replace` moves the source's quantity onto the target, summing with
/// whatever the target already holds. An absent source makes it a no-op.
fn apply_override(
    map: &mut MaterialMap,
    op: &OverrideOp,
    variant: &VariantId,
    context: impl FnOnce() -> String,
) -> Result<()> {
    match op {
        OverrideOp::Replace {
            source,
            target,
            quantity,
        } => match map.remove(source) {
            Some(replaced) => {
                accumulate(map, target, quantity.unwrap_or(replaced))
                    .ok_or_else(|| overflow(target, context))?;
            }
            None => {
                tracing::debug!(
                    variant = %variant,
                    source = %source,
                    target = %target,
                    "replace source absent from BOM, skipping"
                );
            }
        },
        OverrideOp::Add { material, quantity } => {
            accumulate(map, material, *quantity).ok_or_else(|| overflow(material, context))?;
        }
        OverrideOp::Remove { material } => {
            map.remove(material);
        }
        OverrideOp::SetQuantity { material, quantity } => {
            map.insert(material.clone(), *quantity);
        }
    }
    Ok(())
}

fn clamp_negatives(map: &mut MaterialMap) -> Vec<BomAnomaly> {
    let mut anomalies = Vec::new();
    for (material_id, quantity) in map.iter_mut() {
        if *quantity < Decimal::ZERO {
            anomalies.push(BomAnomaly::NegativeQuantityClamped {
                material_id: material_id.clone(),
                computed: *quantity,
            });
            *quantity = Decimal::ZERO;
        }
    }
    anomalies
}
