//! SKU construction and collision handling.

use crate::catalog::{AttributeOption, Product};
use crate::config::SkuConfig;
use crate::error::{CommerceError, Result};
use std::collections::HashSet;

/// Uppercase alphanumeric prefix of `value`, at most `len` characters.
pub fn abbreviate(value: &str, len: usize) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .take(len)
        .collect()
}

/// The SKU segment for one option: its explicit code, else an abbreviation.
pub fn option_segment(option: &AttributeOption, config: &SkuConfig) -> String {
    if let Some(code) = option.code.as_deref().filter(|c| !c.trim().is_empty()) {
        return code.trim().to_string();
    }
    let segment = abbreviate(&option.value, config.abbreviation_length);
    if segment.is_empty() {
        abbreviate(option.id.as_str(), config.abbreviation_length)
    } else {
        segment
    }
}

/// SKU before disambiguation: prefix plus one segment per option.
pub fn base_sku(product: &Product, options: &[&AttributeOption], config: &SkuConfig) -> String {
    let prefix = if product.sku_prefix.trim().is_empty() {
        product.id.as_str().to_uppercase()
    } else {
        product.sku_prefix.trim().to_string()
    };

    std::iter::once(prefix)
        .chain(
            options
                .iter()
                .map(|o| option_segment(o, config))
                .filter(|s| !s.is_empty()),
        )
        .collect::<Vec<_>>()
        .join(&config.separator)
}

/// Hands out SKUs that are unique within one product.
///
/// Seeded with every SKU already in use, so the lowest free suffix depends
/// only on catalog state.
#[derive(Debug)]
pub struct SkuAllocator<'a> {
    taken: HashSet<String>,
    config: &'a SkuConfig,
}

impl<'a> SkuAllocator<'a> {
    pub fn new<I, S>(existing: I, config: &'a SkuConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: existing.into_iter().map(Into::into).collect(),
            config,
        }
    }

    /// Claim `base`, or `base` + separator + the lowest free suffix.
    pub fn allocate(&mut self, base: &str) -> Result<String> {
        if self.taken.insert(base.to_string()) {
            return Ok(base.to_string());
        }
        for n in 1..=self.config.max_suffix {
            let candidate = format!("{}{}{}", base, self.config.separator, n);
            if self.taken.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        Err(CommerceError::SkuExhausted {
            sku: base.to_string(),
        })
    }
}
