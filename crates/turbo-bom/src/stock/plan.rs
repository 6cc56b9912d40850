//! Material quantities a production batch will consume.

use crate::bom::ResolvedBom;
use crate::error::{CommerceError, Result};
use crate::ids::{MaterialId, VariantId};
use crate::quantity::{MaterialMap, Quantity};
use rust_decimal::Decimal;
use serde::Serialize;

/// Total consumption for `units` of one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionPlan {
    pub variant_id: VariantId,
    pub units: u64,
    /// `resolved_quantity * units` for every material with a requirement.
    pub materials: MaterialMap,
}

impl ConsumptionPlan {
    pub fn for_units(bom: &ResolvedBom, units: u64) -> Result<Self> {
        if units == 0 {
            return Err(CommerceError::InvalidQuantity(
                "a production batch needs at least one unit".to_string(),
            ));
        }
        let factor = Decimal::from(units);
        let materials = bom
            .constrained()
            .map(|(id, per_unit)| {
                per_unit
                    .checked_mul(factor)
                    .map(|total| (id.clone(), total))
                    .ok_or_else(|| {
                        CommerceError::InvalidQuantity(format!(
                            "{} x {} of {} overflows",
                            per_unit, units, id
                        ))
                    })
            })
            .collect::<Result<MaterialMap>>()?;

        Ok(Self {
            variant_id: bom.variant_id.clone(),
            units,
            materials,
        })
    }

    pub fn quantity(&self, material: &MaterialId) -> Quantity {
        self.materials.get(material).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
