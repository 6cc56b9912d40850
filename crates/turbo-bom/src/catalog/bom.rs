//! Raw materials and the four layers of bill-of-materials rules.

use crate::ids::{MaterialId, OptionId, ProductId, VariantId};
use crate::quantity::{Quantity, UnitOfMeasure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A raw material consumed by production.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawMaterial {
    pub id: MaterialId,
    pub name: String,
    #[serde(default)]
    pub unit: UnitOfMeasure,
    /// On-hand quantity in `unit`.
    #[serde(default)]
    pub stock_quantity: Quantity,
    /// Purchase cost of one `unit`.
    #[serde(default)]
    pub cost_per_unit: Decimal,
}

impl RawMaterial {
    pub fn new(id: impl Into<MaterialId>, name: impl Into<String>, unit: UnitOfMeasure) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit,
            stock_quantity: Decimal::ZERO,
            cost_per_unit: Decimal::ZERO,
        }
    }

    pub fn with_stock(mut self, quantity: Quantity) -> Self {
        self.stock_quantity = quantity;
        self
    }

    pub fn with_cost(mut self, cost_per_unit: Decimal) -> Self {
        self.cost_per_unit = cost_per_unit;
        self
    }
}

/// Layer 1: base requirement for every variant of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductBomEntry {
    pub product_id: ProductId,
    pub material_id: MaterialId,
    pub quantity: Quantity,
    #[serde(default)]
    pub unit: UnitOfMeasure,
}

/// Layer 2a: extra material required when an option is selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionBomEntry {
    pub option_id: OptionId,
    pub material_id: MaterialId,
    pub quantity: Quantity,
}

/// How a Layer 2b modifier changes a material quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ModifierOp {
    /// Scale the current quantity by a factor.
    Multiply(Decimal),
    /// Increment the current quantity by a signed delta.
    Add(Decimal),
    /// Replace the quantity outright.
    Set(Decimal),
}

impl ModifierOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierOp::Multiply(_) => "multiply",
            ModifierOp::Add(_) => "add",
            ModifierOp::Set(_) => "set",
        }
    }
}

/// Layer 2b: adjustment applied to a material when an option is selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionBomModifier {
    pub option_id: OptionId,
    pub material_id: MaterialId,
    pub op: ModifierOp,
}

/// A Layer 3 operation scoped to one variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverrideOp {
    /// Swap `source` for `target`, carrying the source quantity unless one is given.
    Replace {
        source: MaterialId,
        target: MaterialId,
        #[serde(default)]
        quantity: Option<Quantity>,
    },
    /// Insert a material or sum into its quantity.
    Add {
        material: MaterialId,
        quantity: Quantity,
    },
    /// Drop a material.
    Remove { material: MaterialId },
    /// Force a material's quantity.
    SetQuantity {
        material: MaterialId,
        quantity: Quantity,
    },
}

impl OverrideOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideOp::Replace { .. } => "replace",
            OverrideOp::Add { .. } => "add",
            OverrideOp::Remove { .. } => "remove",
            OverrideOp::SetQuantity { .. } => "set_quantity",
        }
    }

    /// Every material this operation names.
    pub fn materials(&self) -> Vec<&MaterialId> {
        match self {
            OverrideOp::Replace { source, target, .. } => vec![source, target],
            OverrideOp::Add { material, .. }
            | OverrideOp::Remove { material }
            | OverrideOp::SetQuantity { material, .. } => vec![material],
        }
    }
}

/// Layer 3: per-variant override, applied in list order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantBomOverride {
    pub variant_id: VariantId,
    pub op: OverrideOp,
}
