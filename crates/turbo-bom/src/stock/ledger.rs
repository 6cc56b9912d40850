//! Stock ledger: the only writer of raw-material stock.

use super::movement::{MovementType, StockMovement, StockSubject};
use super::plan::ConsumptionPlan;
use crate::catalog::CatalogSnapshot;
use crate::error::{CommerceError, Result};
use crate::ids::{BatchId, MaterialId, VariantId};
use crate::quantity::{MaterialMap, Quantity};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Source of current stock and destination of stock movements.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Current quantity of every tracked material.
    async fn stock_levels(&self) -> Result<MaterialMap>;

    /// Add supplier stock to a material.
    async fn receive(
        &self,
        material: &MaterialId,
        quantity: Quantity,
        reference: Option<&str>,
    ) -> Result<StockMovement>;

    /// Apply a signed manual correction. Stock may not go below zero.
    async fn adjust(
        &self,
        material: &MaterialId,
        delta: Quantity,
        actor: Option<&str>,
    ) -> Result<StockMovement>;

    /// Consume a batch's materials.
    ///
    /// All-or-nothing: either every material is decremented with one
    /// `production_consume` movement each, or nothing is written.
    async fn consume(
        &self,
        plan: &ConsumptionPlan,
        batch: &BatchId,
        actor: Option<&str>,
    ) -> Result<Vec<StockMovement>>;

    /// Consume a batch's materials and book its finished units.
    async fn produce(
        &self,
        plan: &ConsumptionPlan,
        batch: &BatchId,
        actor: Option<&str>,
    ) -> Result<Vec<StockMovement>>;

    /// Finished stock of a variant.
    async fn variant_stock(&self, variant: &VariantId) -> Result<u64>;

    /// Every movement recorded so far, oldest first.
    async fn movements(&self) -> Result<Vec<StockMovement>>;
}

type Row = Arc<Mutex<Quantity>>;

/// In-process ledger with one lock per material row.
///
/// Concurrent batches touching the same material serialize on that row;
/// rows are always locked in material-id order.
#[derive(Debug, Default)]
pub struct InMemoryStockLedger {
    rows: RwLock<HashMap<MaterialId, Row>>,
    variants: Mutex<HashMap<VariantId, u64>>,
    log: Mutex<Vec<StockMovement>>,
}

impl InMemoryStockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stock(stock: MaterialMap) -> Self {
        let rows = stock
            .into_iter()
            .map(|(id, quantity)| (id, Arc::new(Mutex::new(quantity))))
            .collect();
        Self {
            rows: RwLock::new(rows),
            ..Self::default()
        }
    }

    /// Seed rows from the materials in a catalog snapshot.
    pub fn from_snapshot(snapshot: &CatalogSnapshot) -> Self {
        Self::with_stock(crate::producibility::snapshot_stock(snapshot))
    }

    async fn row(&self, material: &MaterialId) -> Result<Row> {
        self.rows
            .read()
            .await
            .get(material)
            .cloned()
            .ok_or_else(|| CommerceError::MissingMaterialReference {
                material: material.to_string(),
                context: "stock ledger".to_string(),
            })
    }

    /// Lock every row in the plan, in material-id order.
    async fn lock_rows(
        &self,
        plan: &ConsumptionPlan,
    ) -> Result<Vec<(MaterialId, Quantity, OwnedMutexGuard<Quantity>)>> {
        let mut locked = Vec::with_capacity(plan.materials.len());
        for (material, required) in &plan.materials {
            let guard = self.row(material).await?.lock_owned().await;
            locked.push((material.clone(), *required, guard));
        }
        Ok(locked)
    }

    /// Check and decrement every row of the plan under its lock. With
    /// `book_output`, the finished units are booked before the rows unlock.
    async fn consume_locked(
        &self,
        plan: &ConsumptionPlan,
        batch: &BatchId,
        actor: Option<&str>,
        book_output: bool,
    ) -> Result<Vec<StockMovement>> {
        let mut locked = self.lock_rows(plan).await?;

        for (material, required, guard) in &locked {
            if **guard < *required {
                return Err(CommerceError::InsufficientMaterial {
                    material: material.to_string(),
                    required: *required,
                    available: **guard,
                });
            }
        }

        let mut movements = Vec::with_capacity(locked.len());
        for (material, required, guard) in &mut locked {
            let before = **guard;
            **guard -= *required;
            movements.push(
                StockMovement::new(
                    StockSubject::Material(material.clone()),
                    before,
                    **guard,
                    MovementType::ProductionConsume,
                )
                .with_reference(batch.as_str())
                .with_actor(actor),
            );
        }

        if book_output {
            let mut variants = self.variants.lock().await;
            let finished = variants.entry(plan.variant_id.clone()).or_insert(0);
            let before = *finished;
            *finished = finished.saturating_add(plan.units);
            movements.push(
                StockMovement::new(
                    StockSubject::Variant(plan.variant_id.clone()),
                    Decimal::from(before),
                    Decimal::from(*finished),
                    MovementType::ProductionOutput,
                )
                .with_reference(batch.as_str())
                .with_actor(actor),
            );
        }

        // Recorded before the row locks are released.
        self.log.lock().await.extend(movements.iter().cloned());
        drop(locked);
        Ok(movements)
    }
}

#[async_trait]
impl StockLedger for InMemoryStockLedger {
    async fn stock_levels(&self) -> Result<MaterialMap> {
        let rows: Vec<(MaterialId, Row)> = self
            .rows
            .read()
            .await
            .iter()
            .map(|(id, row)| (id.clone(), row.clone()))
            .collect();

        let mut levels = MaterialMap::new();
        for (id, row) in rows {
            let quantity = *row.lock().await;
            levels.insert(id, quantity);
        }
        Ok(levels)
    }

    async fn receive(
        &self,
        material: &MaterialId,
        quantity: Quantity,
        reference: Option<&str>,
    ) -> Result<StockMovement> {
        if quantity <= Decimal::ZERO {
            return Err(CommerceError::InvalidQuantity(format!(
                "received quantity must be positive, got {}",
                quantity
            )));
        }

        let row = {
            let mut rows = self.rows.write().await;
            rows.entry(material.clone())
                .or_insert_with(|| Arc::new(Mutex::new(Decimal::ZERO)))
                .clone()
        };
        let mut current = row.lock().await;
        let before = *current;
        *current += quantity;

        let mut movement = StockMovement::new(
            StockSubject::Material(material.clone()),
            before,
            *current,
            MovementType::Restock,
        );
        if let Some(reference) = reference {
            movement = movement.with_reference(reference);
        }
        self.log.lock().await.push(movement.clone());
        Ok(movement)
    }

    async fn adjust(
        &self,
        material: &MaterialId,
        delta: Quantity,
        actor: Option<&str>,
    ) -> Result<StockMovement> {
        let row = self.row(material).await?;
        let mut current = row.lock().await;
        let before = *current;
        let after = before + delta;
        if after < Decimal::ZERO {
            return Err(CommerceError::InsufficientMaterial {
                material: material.to_string(),
                required: -delta,
                available: before,
            });
        }
        *current = after;

        let movement = StockMovement::new(
            StockSubject::Material(material.clone()),
            before,
            after,
            MovementType::Adjustment,
        )
        .with_actor(actor);
        self.log.lock().await.push(movement.clone());
        Ok(movement)
    }

    async fn consume(
        &self,
        plan: &ConsumptionPlan,
        batch: &BatchId,
        actor: Option<&str>,
    ) -> Result<Vec<StockMovement>> {
        let movements = self.consume_locked(plan, batch, actor, false).await?;

        tracing::info!(
            batch = %batch,
            variant = %plan.variant_id,
            units = plan.units,
            materials = movements.len(),
            "consumed production materials"
        );
        Ok(movements)
    }

    async fn produce(
        &self,
        plan: &ConsumptionPlan,
        batch: &BatchId,
        actor: Option<&str>,
    ) -> Result<Vec<StockMovement>> {
        let movements = self.consume_locked(plan, batch, actor, true).await?;

        tracing::info!(
            batch = %batch,
            variant = %plan.variant_id,
            units = plan.units,
            materials = movements.len() - 1,
            "produced finished units"
        );
        Ok(movements)
    }

    async fn variant_stock(&self, variant: &VariantId) -> Result<u64> {
        Ok(self.variants.lock().await.get(variant).copied().unwrap_or(0))
    }

    async fn movements(&self) -> Result<Vec<StockMovement>> {
        Ok(self.log.lock().await.clone())
    }
}
