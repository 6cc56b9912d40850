//! Engine error types.

use crate::quantity::Quantity;
use thiserror::Error;

/// Errors that can occur while generating variants or resolving materials.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variant not found.
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// An attribute has options, but none of them are active.
    #[error("Attribute {attribute} has no active options")]
    NoActiveOptions { attribute: String },

    /// Catalog snapshot is internally inconsistent.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Two attributes of one product share a position.
    #[error("Attributes {first} and {second} share position {position}")]
    DuplicateAttributePosition {
        first: String,
        second: String,
        position: i32,
    },

    /// Every disambiguation suffix for a generated SKU is taken.
    #[error("No free SKU suffix left for {sku}")]
    SkuExhausted { sku: String },

    /// A BOM entry, modifier or override references an unknown raw material.
    #[error("Raw material {material} referenced by {context} does not exist")]
    MissingMaterialReference { material: String, context: String },

    /// Not enough raw material to run a production batch.
    #[error("Insufficient stock of {material}: required {required}, available {available}")]
    InsufficientMaterial {
        material: String,
        required: Quantity,
        available: Quantity,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A price or weight sum left the representable range.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// Regeneration lock could not be acquired in time.
    #[error("Timed out waiting for regeneration lock on product {0}")]
    LockTimeout(String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::ConfigError(e.to_string())
    }
}

/// Result alias used throughout the engine.
pub type Result<T, E = CommerceError> = std::result::Result<T, E>;
