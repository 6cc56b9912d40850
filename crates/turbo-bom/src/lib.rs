//! Variant and bill-of-materials resolution for TurboCommerce.
//!
//! This crate turns a product's attribute/option configuration into concrete
//! variants and answers questions about each of them:
//!
//! - **Variants**: Cartesian generation, reconciliation, SKU assignment
//! - **Pricing**: Effective price and weight from base values and option modifiers
//! - **BOM**: Layered material resolution (product, options, overrides)
//! - **Producibility**: Units producible from current raw-material stock
//! - **Stock**: Transactional consumption through a [`stock::StockLedger`]
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_bom::prelude::*;
//!
//! let snapshot: CatalogSnapshot = serde_json::from_str(&json)?;
//! let config = EngineConfig::default();
//!
//! // Generate variants against what is already stored
//! let outcome = VariantGenerator::new(&config.sku).generate(&snapshot, &existing)?;
//!
//! for variant in outcome.all_variants() {
//!     let pricing = PricingResolver::new(&snapshot).resolve(variant)?;
//!     let bom = BomResolver::new(&snapshot).resolve(variant)?;
//!     let units = ProducibilityCalculator::for_bom(&bom, &snapshot_stock(&snapshot));
//!     println!("{} {} {:?}", variant.sku, pricing.price.rounded(), units);
//! }
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod quantity;
pub mod config;

pub mod catalog;
pub mod variants;
pub mod pricing;
pub mod bom;
pub mod producibility;
pub mod stock;
pub mod service;

pub use config::EngineConfig;
pub use error::{CommerceError, Result};
pub use ids::*;
pub use money::{Currency, Money};
pub use quantity::{MaterialMap, Quantity, UnitOfMeasure};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{EngineConfig, RegenerationConfig, SkuConfig};
    pub use crate::error::{CommerceError, Result};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::quantity::{MaterialMap, Quantity, UnitOfMeasure};

    // Catalog
    pub use crate::catalog::{
        Attribute, AttributeOption, AttributeType, CatalogSnapshot, ModifierOp, OptionBomEntry,
        OptionBomModifier, OptionKey, OverrideOp, Product, ProductBomEntry, RawMaterial, Variant,
        VariantBomOverride, VariantOption,
    };

    // Resolution
    pub use crate::bom::{BomAnomaly, BomLine, BomResolver, ResolvedBom};
    pub use crate::pricing::{EffectivePricing, PricingResolver};
    pub use crate::producibility::{snapshot_stock, Producibility, ProducibilityCalculator};
    pub use crate::variants::{GenerationOutcome, VariantChange, VariantGenerator};

    // Stock
    pub use crate::service::{CatalogStore, InMemoryCatalogStore, VariantService};
    pub use crate::stock::{
        ConsumptionPlan, InMemoryStockLedger, MovementType, StockLedger, StockMovement,
    };
}
