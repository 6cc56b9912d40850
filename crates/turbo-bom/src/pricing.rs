//! Effective price and weight of a variant.
//!
//! An explicit variant value always wins. Otherwise the product's base value
//! is adjusted by every selected option's modifier. Prices are summed at
//! full precision; callers round with [`Money::rounded`] when presenting.

use crate::catalog::{AttributeOption, CatalogSnapshot, Variant};
use crate::error::{CommerceError, Result};
use crate::ids::OptionId;
use crate::money::Money;
use serde::Serialize;

/// Price and weight of one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectivePricing {
    pub price: Money,
    pub weight_grams: i64,
    /// True when the price came from the variant's own override.
    pub price_overridden: bool,
    /// True when the weight came from the variant's own override.
    pub weight_overridden: bool,
}

/// Computes effective price and weight against a catalog snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PricingResolver<'a> {
    snapshot: &'a CatalogSnapshot,
}

impl<'a> PricingResolver<'a> {
    pub fn new(snapshot: &'a CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    /// `variant.price`, or base price plus every option's price modifier.
    ///
    /// Options that are inactive still contribute. Options no longer in the
    /// snapshot contribute nothing.
    pub fn effective_price(&self, variant: &Variant) -> Result<Money> {
        if let Some(price) = variant.price {
            return Ok(price);
        }
        let mut total = self.snapshot.product.base_price;
        for selected in &variant.options {
            let Some(option) = self.lookup(variant, &selected.option_id) else {
                continue;
            };
            total = total
                .checked_add_amount(option.price_modifier)
                .ok_or_else(|| overflow("price", variant, option))?;
        }
        Ok(total)
    }

    /// `variant.weight_grams`, or base weight plus every option's weight modifier.
    pub fn effective_weight(&self, variant: &Variant) -> Result<i64> {
        if let Some(grams) = variant.weight_grams {
            return Ok(grams);
        }
        let mut total = self.snapshot.product.base_weight_grams;
        for selected in &variant.options {
            let Some(option) = self.lookup(variant, &selected.option_id) else {
                continue;
            };
            total = total
                .checked_add(option.weight_modifier_grams)
                .ok_or_else(|| overflow("weight", variant, option))?;
        }
        Ok(total)
    }

    pub fn resolve(&self, variant: &Variant) -> Result<EffectivePricing> {
        Ok(EffectivePricing {
            price: self.effective_price(variant)?,
            weight_grams: self.effective_weight(variant)?,
            price_overridden: variant.price.is_some(),
            weight_overridden: variant.weight_grams.is_some(),
        })
    }

    fn lookup(
        &self,
        variant: &Variant,
        option_id: &OptionId,
    ) -> Option<&'a AttributeOption> {
        let option = self.snapshot.option(option_id);
        if option.is_none() {
            tracing::debug!(
                variant = %variant.id,
                option = %option_id,
                "option missing from snapshot, ignoring its modifiers"
            );
        }
        option
    }
}

fn overflow(field: &str, variant: &Variant, option: &AttributeOption) -> CommerceError {
    CommerceError::Overflow(format!(
        "{} of variant {} overflows at option {}",
        field, variant.sku, option.id
    ))
}
