//! Product and variant types.

use crate::ids::{AttributeId, OptionId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A configurable product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Prefix every generated variant SKU starts with.
    pub sku_prefix: String,
    /// Price before option modifiers.
    pub base_price: Money,
    /// Weight in grams before option modifiers.
    pub base_weight_grams: i64,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        sku_prefix: impl Into<String>,
        base_price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku_prefix: sku_prefix.into(),
            base_price,
            base_weight_grams: 0,
        }
    }

    pub fn with_base_weight(mut self, grams: i64) -> Self {
        self.base_weight_grams = grams;
        self
    }
}

/// One selected option within a variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantOption {
    pub attribute_id: AttributeId,
    pub option_id: OptionId,
}

impl VariantOption {
    pub fn new(attribute_id: impl Into<AttributeId>, option_id: impl Into<OptionId>) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            option_id: option_id.into(),
        }
    }
}

/// Identity of a variant across regenerations: its option-set, sorted.
///
/// Two variants with the same selections in a different order have equal keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct OptionKey(Vec<VariantOption>);

impl OptionKey {
    pub fn new(options: impl IntoIterator<Item = VariantOption>) -> Self {
        let mut options: Vec<VariantOption> = options.into_iter().collect();
        options.sort();
        Self(options)
    }

    /// The key of a simple product's only variant.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn options(&self) -> &[VariantOption] {
        &self.0
    }
}

/// A purchasable combination of options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// Unique variant identifier.
    pub id: VariantId,
    /// Parent product ID.
    pub product_id: ProductId,
    /// Stock keeping unit, unique per product.
    pub sku: String,
    /// Display name (e.g., "Black / Large").
    pub name: String,
    /// Selected options, in attribute position order.
    pub options: Vec<VariantOption>,
    /// Explicit price, overriding base price and option modifiers.
    #[serde(default)]
    pub price: Option<Money>,
    /// Explicit weight in grams, overriding base weight and option modifiers.
    #[serde(default)]
    pub weight_grams: Option<i64>,
    /// Finished units on hand.
    #[serde(default)]
    pub stock_quantity: u64,
    /// Inactive variants are kept for order history but not sold.
    pub is_active: bool,
    /// Sort position within the product.
    #[serde(default)]
    pub position: i32,
}

impl Variant {
    /// Create a new active variant with no stock and no overrides.
    pub fn new(product_id: ProductId, sku: impl Into<String>, options: Vec<VariantOption>) -> Self {
        Self {
            id: VariantId::generate(),
            product_id,
            sku: sku.into(),
            name: String::new(),
            options,
            price: None,
            weight_grams: None,
            stock_quantity: 0,
            is_active: true,
            position: 0,
        }
    }

    /// The variant's identity key.
    pub fn key(&self) -> OptionKey {
        OptionKey::new(self.options.iter().cloned())
    }

    /// The option this variant selects for an attribute, if any.
    pub fn selected_option(&self, attribute_id: &AttributeId) -> Option<&OptionId> {
        self.options
            .iter()
            .find(|o| &o.attribute_id == attribute_id)
            .map(|o| &o.option_id)
    }

    /// Whether this is a simple product's default variant.
    pub fn is_default(&self) -> bool {
        self.options.is_empty()
    }
}
