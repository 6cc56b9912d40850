//! Target-set computation and reconciliation against existing variants.

use super::sku::{base_sku, SkuAllocator};
use crate::catalog::{AttributeOption, CatalogSnapshot, OptionKey, Variant, VariantOption};
use crate::config::SkuConfig;
use crate::error::{CommerceError, Result};
use crate::ids::{ProductId, VariantId};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// A write the persistence layer must apply after a generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "change", content = "variant", rename_all = "snake_case")]
pub enum VariantChange {
    /// Insert a new variant.
    Created(Variant),
    /// Flip an existing variant back to active.
    Reactivated(VariantId),
    /// Flip an existing variant to inactive. Variants are never deleted.
    Deactivated(VariantId),
}

/// A target combination that could not be materialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationFailure {
    pub key: OptionKey,
    pub error: String,
    #[serde(skip)]
    pub kind: CommerceError,
}

/// Result of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub product_id: ProductId,
    /// Active variants in target order (attribute position, then option position).
    pub target: Vec<Variant>,
    /// Existing variants that fell out of the target set, now inactive.
    pub deactivated: Vec<Variant>,
    /// Writes needed to move from the existing set to this outcome.
    pub changes: Vec<VariantChange>,
    /// Combinations skipped because no SKU could be allocated.
    pub failures: Vec<GenerationFailure>,
}

impl GenerationOutcome {
    pub fn created(&self) -> Vec<&Variant> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                VariantChange::Created(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn reactivated(&self) -> Vec<&VariantId> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                VariantChange::Reactivated(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn deactivated_ids(&self) -> Vec<&VariantId> {
        self.deactivated.iter().map(|v| &v.id).collect()
    }

    pub fn write_count(&self) -> usize {
        self.changes.len()
    }

    /// True when the existing variants already match the catalog.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.failures.is_empty()
    }

    /// Every variant of the product after the changes are applied.
    pub fn all_variants(&self) -> impl Iterator<Item = &Variant> {
        self.target.iter().chain(self.deactivated.iter())
    }
}

/// Derives purchasable variants from a catalog snapshot.
#[derive(Debug, Clone)]
pub struct VariantGenerator<'a> {
    config: &'a SkuConfig,
}

impl<'a> VariantGenerator<'a> {
    pub fn new(config: &'a SkuConfig) -> Self {
        Self { config }
    }

    /// The full target set: one option list per variant, in attribute
    /// position order, enumerated in attribute-then-option position order.
    pub fn target_combinations<'s>(
        &self,
        snapshot: &'s CatalogSnapshot,
    ) -> Result<Vec<Vec<&'s AttributeOption>>> {
        let axes: Vec<_> = snapshot
            .ordered_attributes()
            .into_iter()
            .map(|a| (a, a.active_options()))
            .collect();

        if axes.iter().all(|(_, options)| options.is_empty()) {
            return Ok(vec![Vec::new()]);
        }
        if let Some((attribute, _)) = axes.iter().find(|(_, options)| options.is_empty()) {
            return Err(CommerceError::NoActiveOptions {
                attribute: attribute.id.to_string(),
            });
        }

        let mut combinations: Vec<Vec<&AttributeOption>> = vec![Vec::new()];
        for (_, options) in &axes {
            let mut next = Vec::with_capacity(combinations.len() * options.len());
            for prefix in &combinations {
                for option in options {
                    let mut combination = prefix.clone();
                    combination.push(*option);
                    next.push(combination);
                }
            }
            combinations = next;
        }
        Ok(combinations)
    }

    /// Reconcile the target set against `existing`.
    ///
    /// Existing variants whose option-set is still a target are preserved
    /// (reactivated if needed); the rest are deactivated; missing targets
    /// are created with no stock and no price override.
    pub fn generate(
        &self,
        snapshot: &CatalogSnapshot,
        existing: &[Variant],
    ) -> Result<GenerationOutcome> {
        snapshot.validate()?;
        let combinations = self.target_combinations(snapshot)?;
        let product = &snapshot.product;

        // One survivor per key: the first active variant, else the first seen.
        let mut by_key: HashMap<OptionKey, &Variant> = HashMap::with_capacity(existing.len());
        for variant in existing {
            match by_key.entry(variant.key()) {
                Entry::Vacant(slot) => {
                    slot.insert(variant);
                }
                Entry::Occupied(mut slot) => {
                    if !slot.get().is_active && variant.is_active {
                        slot.insert(variant);
                    }
                }
            }
        }

        let mut allocator = SkuAllocator::new(existing.iter().map(|v| v.sku.clone()), self.config);
        let mut target = Vec::with_capacity(combinations.len());
        let mut changes = Vec::new();
        let mut failures = Vec::new();
        let mut kept: HashSet<&VariantId> = HashSet::new();

        for (position, options) in combinations.iter().enumerate() {
            let selections: Vec<VariantOption> = options
                .iter()
                .map(|o| VariantOption::new(o.attribute_id.clone(), o.id.clone()))
                .collect();
            let key = OptionKey::new(selections.iter().cloned());

            if let Some(&current) = by_key.get(&key) {
                kept.insert(&current.id);
                let mut preserved = current.clone();
                if !preserved.is_active {
                    preserved.is_active = true;
                    changes.push(VariantChange::Reactivated(preserved.id.clone()));
                }
                target.push(preserved);
                continue;
            }

            let sku = match allocator.allocate(&base_sku(product, options, self.config)) {
                Ok(sku) => sku,
                Err(err) => {
                    tracing::warn!(product = %product.id, error = %err, "skipping variant");
                    failures.push(GenerationFailure {
                        key,
                        error: err.to_string(),
                        kind: err,
                    });
                    continue;
                }
            };

            let mut variant = Variant::new(product.id.clone(), sku, selections);
            variant.name = display_name(options);
            variant.position = position as i32;
            changes.push(VariantChange::Created(variant.clone()));
            target.push(variant);
        }

        let mut deactivated = Vec::new();
        for variant in existing {
            if kept.contains(&variant.id) {
                continue;
            }
            let mut retired = variant.clone();
            if retired.is_active {
                retired.is_active = false;
                changes.push(VariantChange::Deactivated(retired.id.clone()));
            }
            deactivated.push(retired);
        }

        tracing::debug!(
            product = %product.id,
            target = target.len(),
            writes = changes.len(),
            failures = failures.len(),
            "generated variants"
        );

        Ok(GenerationOutcome {
            product_id: product.id.clone(),
            target,
            deactivated,
            changes,
            failures,
        })
    }
}

/// "Black / Large", or "Default" for a simple product.
fn display_name(options: &[&AttributeOption]) -> String {
    if options.is_empty() {
        "Default".to_string()
    } else {
        options
            .iter()
            .map(|o| o.display_value.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Attribute, AttributeOption, Product};
    use crate::ids::ProductId;
    use crate::money::{Currency, Money};

    fn belt() -> CatalogSnapshot {
        let product = Product::new("belt", "Belt", "BELT", Money::from_minor(4900, Currency::USD));
        let mut snap = CatalogSnapshot::new(product);
        snap.attributes.push(
            Attribute::new("color", ProductId::new("belt"), "Color", 0)
                .with_option(AttributeOption::new("black", "Black", 0))
                .with_option(AttributeOption::new("brown", "Brown", 1)),
        );
        snap.attributes.push(
            Attribute::new("size", ProductId::new("belt"), "Size", 1)
                .with_option(AttributeOption::new("small", "Small", 0))
                .with_option(AttributeOption::new("large", "Large", 1)),
        );
        snap
    }

    #[test]
    fn test_generates_cartesian_product_in_order() {
        let config = SkuConfig::default();
        let outcome = VariantGenerator::new(&config).generate(&belt(), &[]).unwrap();

        let skus: Vec<&str> = outcome.target.iter().map(|v| v.sku.as_str()).collect();
        assert_eq!(skus, vec!["BELT-BLA-SMA", "BELT-BLA-LAR", "BELT-BRO-SMA", "BELT-BRO-LAR"]);
        assert_eq!(outcome.target[1].name, "Black / Large");
        assert_eq!(outcome.created().len(), 4);
        assert!(outcome.target.iter().all(|v| v.stock_quantity == 0 && v.price.is_none()));
    }

    #[test]
    fn test_simple_product_gets_one_default_variant() {
        let config = SkuConfig::default();
        let product = Product::new("mug", "Mug", "MUG", Money::from_minor(1200, Currency::USD));
        let outcome = VariantGenerator::new(&config)
            .generate(&CatalogSnapshot::new(product), &[])
            .unwrap();

        assert_eq!(outcome.target.len(), 1);
        assert!(outcome.target[0].is_default());
        assert_eq!(outcome.target[0].sku, "MUG");
        assert_eq!(outcome.target[0].name, "Default");
    }

    #[test]
    fn test_all_attributes_empty_yields_default_variant() {
        let config = SkuConfig::default();
        let mut snap = belt();
        for attribute in &mut snap.attributes {
            for option in &mut attribute.options {
                option.is_active = false;
            }
        }
        let outcome = VariantGenerator::new(&config).generate(&snap, &[]).unwrap();
        assert_eq!(outcome.target.len(), 1);
        assert!(outcome.target[0].is_default());
    }

    #[test]
    fn test_one_empty_attribute_is_an_error() {
        let config = SkuConfig::default();
        let mut snap = belt();
        for option in &mut snap.attributes[1].options {
            option.is_active = false;
        }
        let err = VariantGenerator::new(&config).generate(&snap, &[]).unwrap_err();
        assert_eq!(
            err,
            CommerceError::NoActiveOptions {
                attribute: "size".into()
            }
        );
    }

    #[test]
    fn test_second_run_is_noop() {
        let config = SkuConfig::default();
        let generator = VariantGenerator::new(&config);
        let first = generator.generate(&belt(), &[]).unwrap();
        let second = generator.generate(&belt(), &first.target).unwrap();

        assert!(second.is_noop());
        assert_eq!(second.target, first.target);
    }

    #[test]
    fn test_removed_option_deactivates_and_reactivates() {
        let config = SkuConfig::default();
        let generator = VariantGenerator::new(&config);
        let first = generator.generate(&belt(), &[]).unwrap();

        let mut narrowed = belt();
        narrowed.attributes[0].options[1].is_active = false;
        let second = generator.generate(&narrowed, &first.target).unwrap();
        assert_eq!(second.target.len(), 2);
        assert_eq!(second.deactivated_ids().len(), 2);
        assert!(second.deactivated.iter().all(|v| !v.is_active));

        let existing: Vec<Variant> = second.all_variants().cloned().collect();
        let third = generator.generate(&belt(), &existing).unwrap();
        assert_eq!(third.reactivated().len(), 2);
        assert!(third.created().is_empty());
        let ids: Vec<_> = third.target.iter().map(|v| v.id.clone()).collect();
        let original: Vec<_> = first.target.iter().map(|v| v.id.clone()).collect();
        assert_eq!(ids, original);
    }

    #[test]
    fn test_sku_collision_gets_suffix() {
        let config = SkuConfig::default();
        let mut snap = belt();
        snap.attributes[1].options[1].value = "small-ish".into();

        let outcome = VariantGenerator::new(&config).generate(&snap, &[]).unwrap();
        let skus: Vec<&str> = outcome.target.iter().map(|v| v.sku.as_str()).collect();
        assert_eq!(skus, vec!["BELT-BLA-SMA", "BELT-BLA-SMA-1", "BELT-BRO-SMA", "BELT-BRO-SMA-1"]);
    }

    #[test]
    fn test_sku_exhaustion_is_partial() {
        let config = SkuConfig {
            max_suffix: 0,
            ..SkuConfig::default()
        };
        let mut snap = belt();
        snap.attributes[1].options[1].value = "small-ish".into();

        let outcome = VariantGenerator::new(&config).generate(&snap, &[]).unwrap();
        assert_eq!(outcome.target.len(), 2);
        assert_eq!(outcome.failures.len(), 2);
        assert!(matches!(
            outcome.failures[0].kind,
            CommerceError::SkuExhausted { .. }
        ));
    }

    #[test]
    fn test_duplicate_active_keys_are_collapsed() {
        let config = SkuConfig::default();
        let generator = VariantGenerator::new(&config);
        let first = generator.generate(&belt(), &[]).unwrap();

        let mut existing = first.target.clone();
        let mut duplicate = existing[0].clone();
        duplicate.id = VariantId::new("dup");
        duplicate.sku = "BELT-DUP".into();
        existing.push(duplicate);

        let outcome = generator.generate(&belt(), &existing).unwrap();
        assert_eq!(outcome.target.len(), 4);
        assert_eq!(outcome.deactivated_ids(), vec![&VariantId::new("dup")]);
    }
}
