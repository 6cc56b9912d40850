//! Configurable attributes and their options.

use crate::ids::{AttributeId, OptionId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an attribute is presented to shoppers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    #[default]
    Select,
    ColorSwatch,
    ButtonGroup,
    ImageSwatch,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Select => "select",
            AttributeType::ColorSwatch => "color_swatch",
            AttributeType::ButtonGroup => "button_group",
            AttributeType::ImageSwatch => "image_swatch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "select" => Some(AttributeType::Select),
            "color_swatch" => Some(AttributeType::ColorSwatch),
            "button_group" => Some(AttributeType::ButtonGroup),
            "image_swatch" => Some(AttributeType::ImageSwatch),
            _ => None,
        }
    }
}

/// A configurable axis of a product (e.g., Color).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    /// Unique attribute identifier.
    pub id: AttributeId,
    /// Owning product.
    pub product_id: ProductId,
    /// Internal name (e.g., "color").
    pub name: String,
    /// Shopper-facing name (e.g., "Color").
    pub display_name: String,
    /// Presentation type.
    #[serde(default)]
    pub attribute_type: AttributeType,
    /// Resolution order, unique per product.
    pub position: i32,
    /// All options, active and inactive.
    #[serde(default)]
    pub options: Vec<AttributeOption>,
}

impl Attribute {
    pub fn new(
        id: impl Into<AttributeId>,
        product_id: ProductId,
        name: impl Into<String>,
        position: i32,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            product_id,
            display_name: name.clone(),
            name,
            attribute_type: AttributeType::Select,
            position,
            options: Vec::new(),
        }
    }

    /// Append an option, binding it to this attribute.
    pub fn with_option(mut self, mut option: AttributeOption) -> Self {
        option.attribute_id = self.id.clone();
        self.options.push(option);
        self
    }

    /// Active options in position order (ties broken by id).
    pub fn active_options(&self) -> Vec<&AttributeOption> {
        let mut active: Vec<&AttributeOption> =
            self.options.iter().filter(|o| o.is_active).collect();
        active.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        active
    }

    pub fn option(&self, option_id: &OptionId) -> Option<&AttributeOption> {
        self.options.iter().find(|o| &o.id == option_id)
    }
}

/// One concrete value of an attribute (e.g., Black).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeOption {
    /// Unique option identifier.
    pub id: OptionId,
    /// Owning attribute.
    pub attribute_id: AttributeId,
    /// Internal value (e.g., "black").
    pub value: String,
    /// Shopper-facing value (e.g., "Black").
    pub display_value: String,
    /// Explicit SKU segment; abbreviated from `value` when absent.
    #[serde(default)]
    pub code: Option<String>,
    /// Signed amount added to the base price.
    #[serde(default)]
    pub price_modifier: Decimal,
    /// Signed grams added to the base weight.
    #[serde(default)]
    pub weight_modifier_grams: i64,
    /// Order within the attribute.
    #[serde(default)]
    pub position: i32,
    pub is_active: bool,
}

impl AttributeOption {
    pub fn new(id: impl Into<OptionId>, value: impl Into<String>, position: i32) -> Self {
        let value = value.into();
        Self {
            id: id.into(),
            attribute_id: AttributeId::new(""),
            display_value: value.clone(),
            value,
            code: None,
            price_modifier: Decimal::ZERO,
            weight_modifier_grams: 0,
            position,
            is_active: true,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_price_modifier(mut self, modifier: Decimal) -> Self {
        self.price_modifier = modifier;
        self
    }

    pub fn with_weight_modifier(mut self, grams: i64) -> Self {
        self.weight_modifier_grams = grams;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_options_sorted_by_position() {
        let attr = Attribute::new("size", ProductId::new("belt"), "Size", 1)
            .with_option(AttributeOption::new("large", "Large", 2))
            .with_option(AttributeOption::new("small", "Small", 0))
            .with_option(AttributeOption::new("medium", "Medium", 1).inactive());

        let ids: Vec<&str> = attr.active_options().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["small", "large"]);
    }

    #[test]
    fn test_with_option_binds_attribute() {
        let attr = Attribute::new("color", ProductId::new("belt"), "Color", 0)
            .with_option(AttributeOption::new("black", "Black", 0));
        assert_eq!(attr.options[0].attribute_id, attr.id);
    }

    #[test]
    fn test_attribute_type_round_trip() {
        assert_eq!(AttributeType::from_str("COLOR_SWATCH"), Some(AttributeType::ColorSwatch));
        assert_eq!(AttributeType::ImageSwatch.as_str(), "image_swatch");
        assert_eq!(AttributeType::from_str("dropdown"), None);
    }
}
