//! Immutable, point-in-time view of one product's catalog data.

use super::{
    Attribute, AttributeOption, OptionBomEntry, OptionBomModifier, Product, ProductBomEntry,
    RawMaterial, VariantBomOverride,
};
use crate::error::{CommerceError, Result};
use crate::ids::{MaterialId, OptionId, VariantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the engine reads about a product, captured at one instant.
///
/// Resolution functions take a snapshot by reference and never observe
/// a half-applied edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    pub product: Product,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub materials: Vec<RawMaterial>,
    #[serde(default)]
    pub product_bom: Vec<ProductBomEntry>,
    #[serde(default)]
    pub option_bom: Vec<OptionBomEntry>,
    #[serde(default)]
    pub option_modifiers: Vec<OptionBomModifier>,
    #[serde(default)]
    pub variant_overrides: Vec<VariantBomOverride>,
}

impl CatalogSnapshot {
    /// Create a snapshot with no attributes or BOM rules.
    pub fn new(product: Product) -> Self {
        Self {
            product,
            attributes: Vec::new(),
            materials: Vec::new(),
            product_bom: Vec::new(),
            option_bom: Vec::new(),
            option_modifiers: Vec::new(),
            variant_overrides: Vec::new(),
        }
    }

    /// Check structural invariants.
    ///
    /// Attribute positions must be unique, and every option must point back
    /// at the attribute that holds it.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<i32, &Attribute> = HashMap::new();
        for attribute in &self.attributes {
            if let Some(first) = seen.insert(attribute.position, attribute) {
                return Err(CommerceError::DuplicateAttributePosition {
                    first: first.id.to_string(),
                    second: attribute.id.to_string(),
                    position: attribute.position,
                });
            }
            if let Some(stray) = attribute
                .options
                .iter()
                .find(|o| o.attribute_id != attribute.id)
            {
                return Err(CommerceError::InvalidCatalog(format!(
                    "option {} is listed under attribute {} but belongs to {}",
                    stray.id, attribute.id, stray.attribute_id
                )));
            }
        }
        Ok(())
    }

    /// Attributes in resolution order.
    pub fn ordered_attributes(&self) -> Vec<&Attribute> {
        let mut ordered: Vec<&Attribute> = self.attributes.iter().collect();
        ordered.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        ordered
    }

    /// Look up an option by id, whether active or not.
    pub fn option(&self, option_id: &OptionId) -> Option<&AttributeOption> {
        self.attributes.iter().find_map(|a| a.option(option_id))
    }

    pub fn material(&self, material_id: &MaterialId) -> Option<&RawMaterial> {
        self.materials.iter().find(|m| &m.id == material_id)
    }

    pub fn has_material(&self, material_id: &MaterialId) -> bool {
        self.material(material_id).is_some()
    }

    /// Layer 2a entries for an option, in list order.
    pub fn option_entries<'a>(
        &'a self,
        option_id: &'a OptionId,
    ) -> impl Iterator<Item = &'a OptionBomEntry> + 'a {
        self.option_bom.iter().filter(move |e| &e.option_id == option_id)
    }

    /// Layer 2b modifiers for an option, in list order.
    pub fn option_modifiers_for<'a>(
        &'a self,
        option_id: &'a OptionId,
    ) -> impl Iterator<Item = &'a OptionBomModifier> + 'a {
        self.option_modifiers
            .iter()
            .filter(move |m| &m.option_id == option_id)
    }

    /// Layer 3 overrides for a variant, in list order.
    pub fn overrides_for<'a>(
        &'a self,
        variant_id: &'a VariantId,
    ) -> impl Iterator<Item = &'a VariantBomOverride> + 'a {
        self.variant_overrides
            .iter()
            .filter(move |o| &o.variant_id == variant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Attribute, AttributeOption};
    use crate::ids::ProductId;
    use crate::money::{Currency, Money};

    fn snapshot() -> CatalogSnapshot {
        let product = Product::new("belt", "Belt", "BELT", Money::from_minor(4900, Currency::USD));
        CatalogSnapshot::new(product)
    }

    #[test]
    fn test_duplicate_positions_rejected() {
        let mut snap = snapshot();
        snap.attributes.push(Attribute::new("color", ProductId::new("belt"), "Color", 0));
        snap.attributes.push(Attribute::new("size", ProductId::new("belt"), "Size", 0));

        let err = snap.validate().unwrap_err();
        assert!(matches!(
            err,
            CommerceError::DuplicateAttributePosition { position: 0, .. }
        ));
    }

    #[test]
    fn test_stray_option_rejected() {
        let mut snap = snapshot();
        let mut attr = Attribute::new("color", ProductId::new("belt"), "Color", 0);
        attr.options.push(AttributeOption::new("black", "Black", 0));
        snap.attributes.push(attr);

        assert!(matches!(snap.validate(), Err(CommerceError::InvalidCatalog(_))));
    }

    #[test]
    fn test_ordered_attributes_and_option_lookup() {
        let mut snap = snapshot();
        snap.attributes.push(
            Attribute::new("size", ProductId::new("belt"), "Size", 1)
                .with_option(AttributeOption::new("large", "Large", 0).inactive()),
        );
        snap.attributes.push(
            Attribute::new("color", ProductId::new("belt"), "Color", 0)
                .with_option(AttributeOption::new("black", "Black", 0)),
        );

        assert!(snap.validate().is_ok());
        let order: Vec<&str> = snap.ordered_attributes().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["color", "size"]);
        assert!(snap.option(&OptionId::new("large")).is_some());
        assert!(snap.option(&OptionId::new("missing")).is_none());
    }
}
