//! Product catalog module.
//!
//! Contains the read-only catalog types the engine resolves against:
//! products, attributes, options, variants, raw materials and BOM rules.

mod attribute;
mod bom;
mod product;
mod snapshot;

pub use attribute::{Attribute, AttributeOption, AttributeType};
pub use bom::{
    ModifierOp, OptionBomEntry, OptionBomModifier, OverrideOp, ProductBomEntry, RawMaterial,
    VariantBomOverride,
};
pub use product::{OptionKey, Product, Variant, VariantOption};
pub use snapshot::CatalogSnapshot;
