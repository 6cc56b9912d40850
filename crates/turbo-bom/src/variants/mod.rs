//! Variant generation.
//!
//! Turns a product's attributes into the set of purchasable variants and
//! reconciles that set against the variants already stored.

mod generator;
mod sku;

pub use generator::{GenerationFailure, GenerationOutcome, VariantChange, VariantGenerator};
pub use sku::{abbreviate, base_sku, option_segment, SkuAllocator};
