//! Append-only stock movement records.

use crate::ids::{MaterialId, MovementId, VariantId};
use crate::quantity::Quantity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a movement changed the stock of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum StockSubject {
    Material(MaterialId),
    Variant(VariantId),
}

/// Why stock moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Raw material used by a production batch.
    ProductionConsume,
    /// Finished units produced by a batch.
    ProductionOutput,
    /// Received from a supplier.
    Restock,
    /// Manual correction.
    Adjustment,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::ProductionConsume => "production_consume",
            MovementType::ProductionOutput => "production_output",
            MovementType::Restock => "restock",
            MovementType::Adjustment => "adjustment",
        }
    }
}

/// One immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub subject: StockSubject,
    /// Signed change (`quantity_after - quantity_before`).
    pub delta: Quantity,
    pub quantity_before: Quantity,
    pub quantity_after: Quantity,
    pub movement_type: MovementType,
    /// Order or batch the movement belongs to.
    pub reference: Option<String>,
    /// Who caused the movement.
    pub actor: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    pub fn new(
        subject: StockSubject,
        quantity_before: Quantity,
        quantity_after: Quantity,
        movement_type: MovementType,
    ) -> Self {
        Self {
            id: MovementId::generate(),
            subject,
            delta: quantity_after - quantity_before,
            quantity_before,
            quantity_after,
            movement_type,
            reference: None,
            actor: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_actor(mut self, actor: Option<&str>) -> Self {
        self.actor = actor.map(str::to_string);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_delta_is_after_minus_before() {
        let movement = StockMovement::new(
            StockSubject::Material(MaterialId::new("thread")),
            dec!(100),
            dec!(96.1),
            MovementType::ProductionConsume,
        )
        .with_reference("batch-1")
        .with_actor(Some("ops"));

        assert_eq!(movement.delta, dec!(-3.9));
        assert_eq!(movement.reference.as_deref(), Some("batch-1"));
        assert_eq!(movement.actor.as_deref(), Some("ops"));
        assert_eq!(movement.movement_type.as_str(), "production_consume");
    }
}
