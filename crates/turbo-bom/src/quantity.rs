//! Material quantities and units of measure.

use crate::ids::MaterialId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A non-binary decimal quantity of some raw material.
pub type Quantity = Decimal;

/// Material requirements or stock levels, keyed in material-id order.
///
/// Ordered keys make two maps built from the same inputs compare and
/// serialize identically.
pub type MaterialMap = BTreeMap<MaterialId, Quantity>;

/// Unit of measure for a raw material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    /// Discrete pieces.
    #[default]
    Piece,
    Meter,
    SquareMeter,
    Gram,
    Kilogram,
    Milliliter,
    Liter,
}

impl UnitOfMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Piece => "pc",
            UnitOfMeasure::Meter => "m",
            UnitOfMeasure::SquareMeter => "m\u{00b2}",
            UnitOfMeasure::Gram => "g",
            UnitOfMeasure::Kilogram => "kg",
            UnitOfMeasure::Milliliter => "ml",
            UnitOfMeasure::Liter => "l",
        }
    }
}

/// Add `quantity` to the entry for `material`, inserting it if absent.
///
/// Returns the new total, or `None` with the map untouched if the sum
/// overflows.
pub(crate) fn accumulate(
    map: &mut MaterialMap,
    material: &MaterialId,
    quantity: Quantity,
) -> Option<Quantity> {
    let current = map.get(material).copied().unwrap_or(Decimal::ZERO);
    let total = current.checked_add(quantity)?;
    map.insert(material.clone(), total);
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_accumulate_sums_existing_keys() {
        let mut map = MaterialMap::new();
        let thread = MaterialId::new("thread");
        assert_eq!(accumulate(&mut map, &thread, dec!(1.5)), Some(dec!(1.5)));
        assert_eq!(accumulate(&mut map, &thread, dec!(1.5)), Some(dec!(3.0)));
        assert_eq!(map[&thread], dec!(3.0));
    }

    #[test]
    fn test_accumulate_overflow_leaves_map_unchanged() {
        let mut map = MaterialMap::new();
        let thread = MaterialId::new("thread");
        map.insert(thread.clone(), Decimal::MAX);
        assert_eq!(accumulate(&mut map, &thread, dec!(1)), None);
        assert_eq!(map[&thread], Decimal::MAX);
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(UnitOfMeasure::SquareMeter.as_str(), "m\u{00b2}");
        assert_eq!(UnitOfMeasure::default().as_str(), "pc");
    }
}
