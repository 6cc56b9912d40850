//! How many units of a variant current raw-material stock can produce.

use crate::bom::ResolvedBom;
use crate::catalog::CatalogSnapshot;
use crate::ids::MaterialId;
use crate::quantity::MaterialMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

/// Producible units of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Producibility {
    /// No material constrains production.
    Unlimited,
    /// Production is bounded by the listed materials.
    Limited {
        units: u64,
        /// Every material whose stock yields exactly `units`.
        limiting_materials: BTreeSet<MaterialId>,
    },
}

impl Producibility {
    /// Unit count, or `None` when unlimited.
    pub fn units(&self) -> Option<u64> {
        match self {
            Producibility::Unlimited => None,
            Producibility::Limited { units, .. } => Some(*units),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Producibility::Unlimited)
    }

    pub fn limiting_materials(&self) -> Option<&BTreeSet<MaterialId>> {
        match self {
            Producibility::Unlimited => None,
            Producibility::Limited {
                limiting_materials, ..
            } => Some(limiting_materials),
        }
    }

    /// Whether `units` more can be produced right now.
    pub fn can_produce(&self, units: u64) -> bool {
        self.units().map_or(true, |available| available >= units)
    }
}

/// Stateless producibility computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProducibilityCalculator;

impl ProducibilityCalculator {
    /// Compute producible units from per-unit requirements and stock.
    ///
    /// Materials with zero requirement are unconstrained. Missing or
    /// negative stock counts as zero.
    pub fn compute(bom: &MaterialMap, stock: &MaterialMap) -> Producibility {
        let mut best: Option<(u64, BTreeSet<MaterialId>)> = None;

        for (material, required) in bom.iter().filter(|(_, q)| **q > Decimal::ZERO) {
            let available = stock
                .get(material)
                .copied()
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO);
            let possible = whole_units(available, *required);

            let lower = match &mut best {
                Some((units, limiting)) if possible == *units => {
                    limiting.insert(material.clone());
                    false
                }
                Some((units, _)) => possible < *units,
                None => true,
            };
            if lower {
                best = Some((possible, BTreeSet::from([material.clone()])));
            }
        }

        match best {
            None => Producibility::Unlimited,
            Some((units, limiting_materials)) => Producibility::Limited {
                units,
                limiting_materials,
            },
        }
    }

    pub fn for_bom(bom: &ResolvedBom, stock: &MaterialMap) -> Producibility {
        Self::compute(&bom.quantities, stock)
    }
}

/// Current stock of every material in a snapshot.
pub fn snapshot_stock(snapshot: &CatalogSnapshot) -> MaterialMap {
    snapshot
        .materials
        .iter()
        .map(|m| (m.id.clone(), m.stock_quantity))
        .collect()
}

/// `floor(available / required)`, saturating at `u64::MAX`.
fn whole_units(available: Decimal, required: Decimal) -> u64 {
    match available.checked_div(required) {
        Some(ratio) => ratio.floor().to_u64().unwrap_or(u64::MAX),
        None => u64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn map(entries: &[(&str, Decimal)]) -> MaterialMap {
        entries
            .iter()
            .map(|(id, q)| (MaterialId::new(*id), *q))
            .collect()
    }

    #[test]
    fn test_fractional_stock_floors() {
        let bom = map(&[("leather", dec!(0.5))]);
        let stock = map(&[("leather", dec!(2.9))]);
        assert_eq!(ProducibilityCalculator::compute(&bom, &stock).units(), Some(5));
    }

    #[test]
    fn test_ties_are_reported_together() {
        let bom = map(&[("a", dec!(1)), ("b", dec!(2)), ("c", dec!(1))]);
        let stock = map(&[("a", dec!(4)), ("b", dec!(8)), ("c", dec!(9))]);

        let result = ProducibilityCalculator::compute(&bom, &stock);
        assert_eq!(result.units(), Some(4));
        let limiting: Vec<&str> = result
            .limiting_materials()
            .unwrap()
            .iter()
            .map(|m| m.as_str())
            .collect();
        assert_eq!(limiting, vec!["a", "b"]);
    }

    #[test]
    fn test_zero_requirements_are_unconstrained() {
        let bom = map(&[("a", dec!(0))]);
        let result = ProducibilityCalculator::compute(&bom, &MaterialMap::new());
        assert!(result.is_unlimited());
        assert!(result.can_produce(1_000_000));
        assert!(result.limiting_materials().is_none());
    }

    #[test]
    fn test_missing_stock_is_zero_not_unlimited() {
        let bom = map(&[("a", dec!(1))]);
        let result = ProducibilityCalculator::compute(&bom, &MaterialMap::new());
        assert_eq!(result.units(), Some(0));
        assert!(!result.can_produce(1));
    }

    #[test]
    fn test_negative_stock_counts_as_zero() {
        let bom = map(&[("a", dec!(1))]);
        let stock = map(&[("a", dec!(-3))]);
        assert_eq!(ProducibilityCalculator::compute(&bom, &stock).units(), Some(0));
    }

    #[test]
    fn test_tiny_requirement_saturates() {
        let bom = map(&[("a", dec!(0.0000000000000000000000000001))]);
        let stock = map(&[("a", dec!(79228162514264337593543950335))]);
        assert_eq!(ProducibilityCalculator::compute(&bom, &stock).units(), Some(u64::MAX));
    }
}
